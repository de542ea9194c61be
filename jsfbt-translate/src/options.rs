//! Pipeline configuration.

use jsfbt::{HashAlgorithm, ResolveOptions};
use serde::{Deserialize, Serialize};

/// Options of [`translate`](crate::translate)
///
/// # Example
///
/// ```ignore
/// let options: TranslateOptions = serde_json::from_str(r#"{"strict": true, "keyByPhraseHash": true}"#)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslateOptions {
    /// Missing or unusable translations abort the locale instead of being logged
    pub strict: bool,
    /// Emit leaves as `[translation, hash]`
    pub include_hash: bool,
    /// Leaf hasher for phrases collected without `hashToLeaf`
    pub hash_algorithm: HashAlgorithm,
    /// Key each locale's results by phrase hash key instead of by position
    pub key_by_phrase_hash: bool,
}

impl TranslateOptions {
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_include_hash(mut self, include_hash: bool) -> Self {
        self.include_hash = include_hash;
        self
    }

    pub fn with_hash_algorithm(mut self, hash_algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = hash_algorithm;
        self
    }

    pub fn with_key_by_phrase_hash(mut self, key_by_phrase_hash: bool) -> Self {
        self.key_by_phrase_hash = key_by_phrase_hash;
        self
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions::default()
            .with_strict(self.strict)
            .with_include_hash(self.include_hash)
    }
}
