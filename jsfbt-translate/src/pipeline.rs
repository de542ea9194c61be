//! Multi-locale translation of collected phrases.
//!
//! Every phrase is turned into a [`PhraseSite`] once. Each translation group
//! is then filtered, resolved phrase by phrase with the group's
//! [`TranslationConfig`], and reported on its own: a locale whose resolution
//! fails is recorded in [`TranslateReport::failures`] and the remaining
//! locales are still translated.

use crate::artifacts::{ExtractedPhrase, TranslateInput, TranslateOutput, TranslatedGroup, TranslationGroup};
use crate::error::{TranslateError, TranslateResult};
use crate::options::TranslateOptions;
use jsfbt::{
    Diagnostic, DiagnosticKind, FbtError, FbtResult, HashToTranslation, LocaleVariationCatalog,
    PatternHash, PhraseSite, TranslationConfig, TranslationRecord, TranslationResult,
    phrase_hash_key, resolve,
};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::collections::{BTreeMap, HashSet};

/// A locale whose resolution was aborted
#[derive(Debug)]
pub struct LocaleFailure {
    pub locale: String,
    pub error: FbtError,
}

impl Serialize for LocaleFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("locale", &self.locale)?;
        map.serialize_entry("message", &self.error.to_string())?;
        map.end()
    }
}

/// Translated output plus everything that went wrong on the way
#[derive(Debug, Serialize)]
pub struct TranslateReport {
    /// Results of every locale that resolved completely
    pub output: TranslateOutput,
    pub failures: Vec<LocaleFailure>,
    pub diagnostics: Vec<Diagnostic>,
}

impl TranslateReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// The output, or the first locale failure
    pub fn into_result(self) -> TranslateResult<TranslateOutput> {
        match self.failures.into_iter().next() {
            Some(LocaleFailure { locale, error }) => Err(TranslateError::Locale {
                locale,
                source: error,
            }),
            None => Ok(self.output),
        }
    }
}

/// Rebuild the phrase site of every collected phrase.
///
/// Phrases packaged without `hashToLeaf` are hashed with the configured
/// algorithm.
pub fn build_sites(
    phrases: &[ExtractedPhrase],
    options: &TranslateOptions,
) -> TranslateResult<Vec<PhraseSite>> {
    phrases
        .iter()
        .enumerate()
        .map(|(index, phrase)| {
            let jsfbt = phrase
                .jsfbt
                .as_ref()
                .ok_or(TranslateError::MissingJsFbt { index })?;
            let site = match &phrase.hash_to_leaf {
                Some(hash_to_leaf) => {
                    PhraseSite::from_scan(hash_to_leaf.clone(), jsfbt, phrase.project.as_str())
                }
                None => PhraseSite::from_jsfbt(jsfbt, phrase.project.as_str(), &options.hash_algorithm),
            };
            site.map_err(|source| TranslateError::Phrase { index, source })
        })
        .collect()
}

/// Drop `null` records, reporting each as a missing translation
pub fn check_and_filter_translations(
    locale: &str,
    translations: &BTreeMap<PatternHash, Option<TranslationRecord>>,
    strict: bool,
    diagnostics: &mut Vec<Diagnostic>,
) -> FbtResult<HashToTranslation> {
    let mut filtered = HashToTranslation::new();
    for (hash, record) in translations {
        match record {
            Some(record) => {
                filtered.insert(hash.clone(), record.clone());
            }
            None => {
                let error = FbtError::MissingTranslation {
                    locale: locale.to_string(),
                    hash: hash.clone(),
                };
                if strict {
                    return Err(error);
                }
                tracing::warn!("{}", error);
                diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::MissingTranslation,
                    locale: locale.to_string(),
                    hash: hash.clone(),
                    message: error.to_string(),
                });
            }
        }
    }
    Ok(filtered)
}

/// Resolve every site for one translation group.
///
/// A leaf hash is reported at most once per kind, however many phrases
/// share it and whether its record was `null` or absent.
pub fn process_translations(
    sites: &[PhraseSite],
    group: &TranslationGroup,
    config: &TranslationConfig,
    options: &TranslateOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> FbtResult<Vec<TranslationResult>> {
    let mut found = Vec::new();
    let translations =
        check_and_filter_translations(config.locale(), &group.translations, options.strict, &mut found)?;
    let mut translated = Vec::with_capacity(sites.len());
    for site in sites {
        let resolution = resolve(site, &translations, config, options.resolve_options())?;
        found.extend(resolution.diagnostics);
        translated.push(resolution.result);
    }

    let mut reported = HashSet::new();
    diagnostics.extend(
        found
            .into_iter()
            .filter(|diagnostic| reported.insert((diagnostic.kind, diagnostic.hash.clone()))),
    );
    Ok(translated)
}

/// Translate every phrase of `input` into every locale of its translation groups.
///
/// # Arguments
/// * `input` - Collected phrases and one translation group per locale
/// * `options` - Strictness, leaf hashing and output shape
///
/// # Returns
/// * `Ok(TranslateReport)` - Output of every locale that resolved, the
///   locales that failed and the non-fatal diagnostics
/// * `Err(TranslateError)` - If a phrase cannot be turned into a site or its
///   hash key cannot be computed
///
/// # Example
///
/// ```ignore
/// let report = translate(&input, &TranslateOptions::default().with_strict(true))?;
/// for failure in &report.failures {
///     eprintln!("{}: {}", failure.locale, failure.error);
/// }
/// ```
pub fn translate(input: &TranslateInput, options: &TranslateOptions) -> TranslateResult<TranslateReport> {
    let catalog = LocaleVariationCatalog::for_locales(
        input.translation_groups.iter().map(|group| group.locale.as_str()),
    );
    translate_with_catalog(input, options, &catalog)
}

/// Like [`translate`], with locale configurations taken from a prebuilt
/// `catalog`. Locales missing from it are loaded on demand.
pub fn translate_with_catalog(
    input: &TranslateInput,
    options: &TranslateOptions,
    catalog: &LocaleVariationCatalog,
) -> TranslateResult<TranslateReport> {
    let sites = build_sites(&input.phrases, options)?;
    let hash_keys = if options.key_by_phrase_hash {
        Some(phrase_hash_keys(&input.phrases)?)
    } else {
        None
    };

    let mut groups = Vec::new();
    let mut failures = Vec::new();
    let mut diagnostics = Vec::new();
    for group in &input.translation_groups {
        let loaded;
        let config = match catalog.get(&group.locale) {
            Some(config) => config,
            None => {
                tracing::debug!(locale = %group.locale, "locale not in catalog, loading");
                loaded = TranslationConfig::for_locale(&group.locale);
                &loaded
            }
        };
        let mut locale_diagnostics = Vec::new();
        match process_translations(&sites, group, config, options, &mut locale_diagnostics) {
            Ok(translated_phrases) => {
                tracing::debug!(
                    locale = %group.locale,
                    phrases = translated_phrases.len(),
                    diagnostics = locale_diagnostics.len(),
                    "translated locale"
                );
                groups.push(TranslatedGroup {
                    locale: group.locale.clone(),
                    translated_phrases,
                });
            }
            Err(error) => {
                tracing::warn!(locale = %group.locale, error = %error, "locale translation aborted");
                failures.push(LocaleFailure {
                    locale: group.locale.clone(),
                    error,
                });
            }
        }
        diagnostics.append(&mut locale_diagnostics);
    }

    let output = match hash_keys {
        Some(hash_keys) => TranslateOutput::ByPhraseHash(key_by_phrase_hash(groups, &hash_keys)),
        None => TranslateOutput::Groups(groups),
    };
    Ok(TranslateReport {
        output,
        failures,
        diagnostics,
    })
}

/// Translate a JSON document of the [`TranslateInput`] shape into the JSON
/// output, failing on the first aborted locale
pub fn translate_json(input: &str, options: &TranslateOptions) -> TranslateResult<String> {
    let input: TranslateInput = serde_json::from_str(input)?;
    let output = translate(&input, options)?.into_result()?;
    Ok(serde_json::to_string(&output)?)
}

fn phrase_hash_keys(phrases: &[ExtractedPhrase]) -> TranslateResult<Vec<String>> {
    phrases
        .iter()
        .enumerate()
        .map(|(index, phrase)| {
            if let Some(key) = &phrase.hash_key {
                return Ok(key.clone());
            }
            let jsfbt = phrase
                .jsfbt
                .as_ref()
                .ok_or(TranslateError::MissingJsFbt { index })?;
            phrase_hash_key(&jsfbt.t).map_err(|source| TranslateError::Phrase { index, source })
        })
        .collect()
}

fn key_by_phrase_hash(
    groups: Vec<TranslatedGroup>,
    hash_keys: &[String],
) -> BTreeMap<String, BTreeMap<String, TranslationResult>> {
    groups
        .into_iter()
        .map(|group| {
            let by_hash = hash_keys
                .iter()
                .cloned()
                .zip(group.translated_phrases)
                .collect();
            (group.locale, by_hash)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn group(value: serde_json::Value) -> TranslationGroup {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_null_records_are_filtered() {
        let group = group(json!({
            "fb-locale": "de_DE",
            "translations": {
                "h1": {"tokens": [], "types": [], "translations": [{"translation": "Hallo", "variations": {}}]},
                "h2": null
            }
        }));
        let mut diagnostics = Vec::new();
        let filtered =
            check_and_filter_translations("de_DE", &group.translations, false, &mut diagnostics).unwrap();
        assert_eq!(filtered.len(), 1);
        assert!(filtered.contains_key("h1"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Missing de_DE translation for string (h2)");
    }

    #[test]
    fn test_null_record_strict() {
        let group = group(json!({"fb-locale": "de_DE", "translations": {"h2": null}}));
        let result = check_and_filter_translations("de_DE", &group.translations, true, &mut Vec::new());
        assert!(matches!(result, Err(FbtError::MissingTranslation { hash, .. }) if hash == "h2"));
    }

    #[test]
    fn test_null_record_reported_once() {
        let group = group(json!({"fb-locale": "de-DE", "translations": {"h2": null}}));
        let site = PhraseSite::from_scan(
            BTreeMap::from([("h2".to_string(), jsfbt::HashedLeaf::new("Hello", "greet"))]),
            &jsfbt::JsFbt {
                m: vec![],
                t: jsfbt::JsFbtTree::Leaf(jsfbt::JsFbtLeaf::new("Hello", "greet")),
            },
            "app",
        )
        .unwrap();
        let config = TranslationConfig::for_locale(&group.locale);
        let mut diagnostics = Vec::new();
        let translated = process_translations(
            &[site.clone(), site],
            &group,
            &config,
            &TranslateOptions::default(),
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(translated.len(), 2);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].locale, "de_DE");
        assert_eq!(diagnostics[0].message, "Missing de_DE translation for string (h2)");
    }

    #[test]
    fn test_into_result_reports_first_failure() {
        let report = TranslateReport {
            output: TranslateOutput::Groups(vec![]),
            failures: vec![LocaleFailure {
                locale: "ru_RU".to_string(),
                error: FbtError::MissingTranslation {
                    locale: "ru_RU".to_string(),
                    hash: "h".to_string(),
                },
            }],
            diagnostics: vec![],
        };
        assert!(!report.is_success());
        let error = report.into_result().unwrap_err();
        assert_eq!(
            error.to_string(),
            "Locale ru_RU: Missing ru_RU translation for string (h)"
        );
    }
}
