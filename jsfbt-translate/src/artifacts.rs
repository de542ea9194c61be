//! Serde models of the JSON artifacts exchanged with the extraction stage and
//! with translation vendors.
//!
//! Collect output:
//!
//! ```json
//! {
//!   "phrases": [
//!     {
//!       "jsfbt": {"m": [{"type": 1, "token": "name"}], "t": {"*": {"text": "{name} liked this", "desc": "like"}}},
//!       "project": "app",
//!       "hashToLeaf": {"8cBlZq": {"text": "{name} liked this", "desc": "like"}}
//!     }
//!   ],
//!   "childParentMappings": {"1": 0}
//! }
//! ```
//!
//! Translation input adds one group per locale:
//!
//! ```json
//! {"fb-locale": "fr_FR", "translations": {"8cBlZq": {"tokens": [], "types": [], "translations": [...]}}}
//! ```

use jsfbt::{HashedLeaf, JsFbt, PatternHash, TranslationRecord, TranslationResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Reverse lookup from leaf hash to the leaf's text and description
pub type HashToLeaf = BTreeMap<PatternHash, HashedLeaf>;

/// One phrase extracted from source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPhrase {
    /// Absent when the extraction ran in terse mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsfbt: Option<JsFbt>,
    #[serde(default)]
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_to_leaf: Option<HashToLeaf>,
    /// Phrase hash key, attached by the phrase packager
    #[serde(default, rename = "hash_key", skip_serializing_if = "Option::is_none")]
    pub hash_key: Option<String>,
    /// Call-site fields carried through untouched (`filename`, `loc`, options, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExtractedPhrase {
    pub fn new(jsfbt: JsFbt, project: impl Into<String>) -> Self {
        ExtractedPhrase {
            jsfbt: Some(jsfbt),
            project: project.into(),
            hash_to_leaf: None,
            hash_key: None,
            extra: Map::new(),
        }
    }
}

/// Output of the collect stage
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectOutput {
    pub phrases: Vec<ExtractedPhrase>,
    /// Child phrase index -> enclosing phrase index
    #[serde(default)]
    pub child_parent_mappings: BTreeMap<usize, usize>,
}

impl CollectOutput {
    /// Index of the phrase enclosing `child`, `None` for top-level phrases
    pub fn parent_of(&self, child: usize) -> Option<usize> {
        self.child_parent_mappings.get(&child).copied()
    }

    /// Indices of the phrases that no other phrase encloses
    pub fn top_level_phrases(&self) -> Vec<usize> {
        (0..self.phrases.len())
            .filter(|index| !self.child_parent_mappings.contains_key(index))
            .collect()
    }
}

/// Translations of one locale; a `null` record marks a known-missing translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationGroup {
    #[serde(rename = "fb-locale")]
    pub locale: String,
    #[serde(default)]
    pub translations: BTreeMap<PatternHash, Option<TranslationRecord>>,
}

/// Phrases and translation groups in one JSON object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateInput {
    pub phrases: Vec<ExtractedPhrase>,
    #[serde(default)]
    pub translation_groups: Vec<TranslationGroup>,
}

/// Phrases resolved for one locale, aligned with the input phrases
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedGroup {
    #[serde(rename = "fb-locale")]
    pub locale: String,
    pub translated_phrases: Vec<TranslationResult>,
}

/// Pipeline output in one of its two shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TranslateOutput {
    /// One group per locale with positional results
    Groups(Vec<TranslatedGroup>),
    /// locale -> phrase hash key -> result
    ByPhraseHash(BTreeMap<String, BTreeMap<String, TranslationResult>>),
}

impl TranslateOutput {
    /// Result of one phrase in one locale, looked up by position or by phrase hash key
    pub fn get(&self, locale: &str, index: usize, hash_key: &str) -> Option<&TranslationResult> {
        match self {
            TranslateOutput::Groups(groups) => groups
                .iter()
                .find(|group| group.locale == locale)
                .and_then(|group| group.translated_phrases.get(index)),
            TranslateOutput::ByPhraseHash(locales) => {
                locales.get(locale).and_then(|phrases| phrases.get(hash_key))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collect_output_roundtrip_keeps_call_site_fields() {
        let value = json!({
            "phrases": [{
                "jsfbt": {"m": [], "t": {"text": "Hello", "desc": "greet"}},
                "project": "app",
                "filename": "Hello.js",
                "loc": {"start": {"line": 1, "column": 0}, "end": {"line": 1, "column": 30}}
            }],
            "childParentMappings": {"1": 0}
        });
        let output: CollectOutput = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(output.phrases[0].project, "app");
        assert_eq!(output.phrases[0].extra["filename"], json!("Hello.js"));
        assert_eq!(serde_json::to_value(&output).unwrap(), value);
    }

    #[test]
    fn test_child_parent_mappings() {
        let output: CollectOutput = serde_json::from_value(json!({
            "phrases": [
                {"jsfbt": {"m": [], "t": {"text": "Welcome {=to the jungle}", "desc": "d"}}},
                {"jsfbt": {"m": [], "t": {"text": "to the {=jungle}", "desc": "d"}}},
                {"jsfbt": {"m": [], "t": {"text": "jungle", "desc": "d"}}}
            ],
            "childParentMappings": {"1": 0, "2": 1}
        }))
        .unwrap();
        assert_eq!(output.parent_of(0), None);
        assert_eq!(output.parent_of(1), Some(0));
        assert_eq!(output.parent_of(2), Some(1));
        assert_eq!(output.top_level_phrases(), vec![0]);
    }

    #[test]
    fn test_translation_group_accepts_null_records() {
        let group: TranslationGroup = serde_json::from_value(json!({
            "fb-locale": "fr_FR",
            "translations": {
                "h1": {"tokens": [], "types": [], "translations": [{"translation": "Bonjour", "variations": {}}]},
                "h2": null
            }
        }))
        .unwrap();
        assert_eq!(group.locale, "fr_FR");
        assert!(group.translations["h1"].is_some());
        assert!(group.translations["h2"].is_none());
    }

    #[test]
    fn test_terse_phrase_without_jsfbt() {
        let phrase: ExtractedPhrase =
            serde_json::from_value(json!({"project": "app", "desc": "greet"})).unwrap();
        assert!(phrase.jsfbt.is_none());
        assert_eq!(phrase.extra["desc"], json!("greet"));
    }
}
