//! Answer values and the answer map

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// A technician's answer to one leaf
///
/// The JSON form is untyped: `true`, `12.5`, `"cumple"`, `["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Checkbox
    Flag(bool),
    /// Number sent as a JSON number
    Number(serde_json::Number),
    /// Text, textarea, number-as-text or single select
    Text(String),
    /// Multi-select
    Choices(Vec<String>),
}

impl AnswerValue {
    /// Blank/whitespace-only text and empty lists count as unanswered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Choices(choices) => choices.is_empty(),
            Self::Flag(_) | Self::Number(_) => false,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Choices(choices) => Some(choices),
            _ => None,
        }
    }

    /// Same variant as `other`, ignoring the contents
    ///
    /// Numbers and text are interchangeable since number inputs store text.
    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Flag(_), Self::Flag(_))
                | (Self::Choices(_), Self::Choices(_))
                | (Self::Text(_) | Self::Number(_), Self::Text(_) | Self::Number(_))
        )
    }
}

impl From<&str> for AnswerValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for AnswerValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(choices: Vec<String>) -> Self {
        Self::Choices(choices)
    }
}

/// Answers keyed by node key, in insertion order
///
/// `null` entries in JSON input are dropped: an explicit `null` and an absent
/// key mean the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerMap(IndexMap<String, AnswerValue>);

impl AnswerMap {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key)
    }

    /// Set an answer, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AnswerValue>) -> Option<AnswerValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style [`AnswerMap::insert`]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<AnswerValue> {
        self.0.shift_remove(key)
    }

    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, AnswerValue)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (String, AnswerValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for AnswerMap {
    type Item = (String, AnswerValue);
    type IntoIter = indexmap::map::IntoIter<String, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'de> Deserialize<'de> for AnswerMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Option<AnswerValue>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect())
    }
}
