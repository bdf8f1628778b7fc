//! Key derivation
//!
//! Keys are lowercase ASCII slugs (`[a-z0-9_]`). Slugifying a slug returns it
//! unchanged, which is what makes re-normalizing a keyed tree idempotent.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

static NON_SLUG: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^a-z0-9]+").expect("static slug pattern is valid"));

/// Prefix of generated keys
pub(crate) const GENERATED_PREFIX: &str = "n_";

/// Turn arbitrary text into a key slug
///
/// Accents on Latin letters are folded (`Revisión` → `revision`), every run of
/// other characters becomes a single `_`, and leading/trailing `_` are
/// trimmed. Returns an empty string when nothing usable is left.
#[must_use]
pub fn slugify(text: &str) -> String {
    let folded: String = text.chars().flat_map(fold_char).collect();
    let lowered = folded.to_lowercase();
    NON_SLUG
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

/// Fresh random key, e.g. `n_3f2a9c01b7de`
#[must_use]
pub fn generate_key() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{GENERATED_PREFIX}{}", &id[..12])
}

/// Whether `key` looks like a [`generate_key`] result
#[must_use]
pub fn is_generated(key: &str) -> bool {
    key.strip_prefix(GENERATED_PREFIX)
        .is_some_and(|rest| rest.len() == 12 && rest.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Append `_2`, `_3`, ... until `taken` reports the candidate as free
pub(crate) fn disambiguate(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (2u32..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(generate_key)
}

fn fold_char(c: char) -> Vec<char> {
    let folded = match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => "a",
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => "A",
        'é' | 'è' | 'ê' | 'ë' => "e",
        'É' | 'È' | 'Ê' | 'Ë' => "E",
        'í' | 'ì' | 'î' | 'ï' => "i",
        'Í' | 'Ì' | 'Î' | 'Ï' => "I",
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => "o",
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => "O",
        'ú' | 'ù' | 'û' | 'ü' => "u",
        'Ú' | 'Ù' | 'Û' | 'Ü' => "U",
        'ñ' => "n",
        'Ñ' => "N",
        'ç' => "c",
        'Ç' => "C",
        'ß' => "ss",
        _ => return vec![c],
    };
    folded.chars().collect()
}
