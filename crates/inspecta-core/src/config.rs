//! Engine configuration
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Files are TOML or YAML, picked by extension.

use inspecta_schema::{DerivedKeyCollision, NormalizeOptions, Normalizer, MAX_DEPTH};
use inspecta_store::{Resolver, VersionFallback};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Extension is neither `.toml` nor `.yaml`/`.yml`
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deepest allowed node (roots are depth 1)
    pub max_depth: usize,
    /// Behavior when a requested version does not exist
    pub version_fallback: VersionFallback,
    /// Behavior when two titles slug to the same key
    pub derived_key_collision: DerivedKeyCollision,
    /// Missing fields listed in validation summaries and rejection messages
    pub missing_preview: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            version_fallback: VersionFallback::default(),
            derived_key_collision: DerivedKeyCollision::default(),
            missing_preview: 3,
        }
    }
}

impl EngineConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_version_fallback(mut self, fallback: VersionFallback) -> Self {
        self.version_fallback = fallback;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_derived_key_collision(mut self, policy: DerivedKeyCollision) -> Self {
        self.derived_key_collision = policy;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_missing_preview(mut self, missing_preview: usize) -> Self {
        self.missing_preview = missing_preview;
        self
    }

    /// # Errors
    /// Returns error on malformed TOML or out-of-range values
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(source)?.validated()
    }

    /// # Errors
    /// Returns error on malformed YAML or out-of-range values
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        // An empty YAML document is `null`, not an empty mapping
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str::<Self>(source)?.validated()
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let read = || {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        let config = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&read()?)?,
            Some("yaml" | "yml") => Self::from_yaml_str(&read()?)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        tracing::debug!(path = %path.display(), ?config, "loaded engine config");
        Ok(config)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        if self.missing_preview == 0 {
            return Err(ConfigError::Invalid("missing_preview must be at least 1".into()));
        }
        Ok(self)
    }

    #[must_use]
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions::default()
            .with_max_depth(self.max_depth)
            .with_derived_key_collision(self.derived_key_collision)
    }

    #[must_use]
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::with_options(self.normalize_options())
    }

    #[must_use]
    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.version_fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.version_fallback, VersionFallback::Latest);
        assert_eq!(config.derived_key_collision, DerivedKeyCollision::Reject);
        assert_eq!(config.missing_preview, 3);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("version_fallback = \"strict\"").unwrap();
        assert_eq!(config.version_fallback, VersionFallback::Strict);
        assert_eq!(config.max_depth, 8);
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn yaml_form() {
        let config = EngineConfig::from_yaml_str(
            "max_depth: 4\nderived_key_collision: disambiguate\n",
        )
        .unwrap();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.derived_key_collision, DerivedKeyCollision::Disambiguate);
        assert_eq!(EngineConfig::from_yaml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn rejects_zero_depth() {
        assert!(matches!(
            EngineConfig::from_toml_str("max_depth = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(matches!(
            EngineConfig::from_toml_str("version_fallback = \"oldest\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn options_flow_into_normalizer() {
        let config = EngineConfig::new()
            .with_max_depth(2)
            .with_derived_key_collision(DerivedKeyCollision::Disambiguate);
        let options = config.normalize_options();
        assert_eq!(options.max_depth, 2);
        assert_eq!(options.derived_key_collision, DerivedKeyCollision::Disambiguate);
        assert_eq!(config.resolver().fallback(), VersionFallback::Latest);
    }
}
