//! Translation records: the per-hash payload of a locale's translation store.
//!
//! ```json
//! {
//!   "tokens": ["name"],
//!   "types": [3],
//!   "translations": [
//!     {"id": 1, "translation": "{name} a aimé ça", "variations": {"0": 1}},
//!     {"id": 2, "translation": "{name} a aimée ça", "variations": {"0": 2}}
//!   ]
//! }
//! ```
//!
//! `variations` maps a position in `tokens` to the locale category the
//! translation was written for. `types` holds the variation mask of each
//! token.

use crate::catalog::TranslationConfig;
use crate::error::{FbtError, FbtResult};
use crate::variations::{VariationMask, WILDCARD};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Category value of one token in a translation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariationValue {
    Code(i64),
    Text(String),
}

impl VariationValue {
    /// Form used inside constraint keys
    pub fn as_key(&self) -> String {
        match self {
            VariationValue::Code(code) => code.to_string(),
            VariationValue::Text(text) => text.clone(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, VariationValue::Text(text) if text == WILDCARD)
    }
}

impl fmt::Display for VariationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

/// One locale-specific rendering of a phrase leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub translation: String,
    #[serde(default)]
    pub variations: BTreeMap<String, VariationValue>,
}

impl TranslationEntry {
    pub fn new(translation: impl Into<String>) -> Self {
        TranslationEntry {
            id: None,
            translation: translation.into(),
            variations: BTreeMap::new(),
        }
    }

    pub fn with_variation(mut self, token_index: usize, value: VariationValue) -> Self {
        self.variations.insert(token_index.to_string(), value);
        self
    }

    /// True when every variation of this entry is a locale default
    pub fn is_default(&self, config: &TranslationConfig) -> bool {
        self.variations.values().all(|value| match value {
            VariationValue::Code(code) => config.is_default_code(*code),
            VariationValue::Text(text) => config.is_default_variation(text),
        })
    }
}

/// All translations of one pattern hash for one locale
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TranslationRecord {
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default)]
    pub types: Vec<VariationMask>,
    #[serde(default)]
    pub translations: Vec<TranslationEntry>,
}

impl TranslationRecord {
    pub fn has_translation(&self) -> bool {
        !self.translations.is_empty()
    }

    /// First entry whose variations are all locale defaults
    pub fn default_translation(&self, config: &TranslationConfig) -> Option<&str> {
        self.translations
            .iter()
            .find(|entry| entry.is_default(config))
            .map(|entry| entry.translation.as_str())
    }

    /// Check that every variation index names a declared token
    pub fn validate(&self, hash: &str) -> FbtResult<()> {
        if !self.types.is_empty() && self.types.len() != self.tokens.len() {
            return Err(FbtError::MalformedRecord {
                hash: hash.to_string(),
                reason: format!(
                    "{} tokens but {} types",
                    self.tokens.len(),
                    self.types.len()
                ),
            });
        }
        for entry in &self.translations {
            for index in entry.variations.keys() {
                self.token_at(hash, index)?;
            }
        }
        Ok(())
    }

    /// Token and mask named by a variation index
    pub fn token_at(&self, hash: &str, index: &str) -> FbtResult<(&str, Option<VariationMask>)> {
        let position: usize = index.parse().map_err(|_| FbtError::MalformedRecord {
            hash: hash.to_string(),
            reason: format!("variation index `{}` is not a token position", index),
        })?;
        let token = self
            .tokens
            .get(position)
            .ok_or_else(|| FbtError::MalformedRecord {
                hash: hash.to_string(),
                reason: format!(
                    "variation index {} is out of range for tokens {:?}",
                    position, self.tokens
                ),
            })?;
        Ok((token, self.types.get(position).copied()))
    }
}
