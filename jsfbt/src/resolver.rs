//! Translation resolver: rebuilds a phrase table for one locale.
//!
//! The resolver walks the hashed source table and replaces every leaf hash
//! with the locale's translation. Levels that vary on a number or gender
//! token are additionally expanded over every category the *locale*
//! distinguishes, which may differ from the categories of the source
//! language. Each record is first flattened into a constraint map:
//!
//! ```text
//!  user%*:count%*   default (unknown) - default (other)
//!  user%1:count%4   male              - one
//!  user%2:count%24  female            - other
//!  ...
//! ```
//!
//! Entries equal to the wildcard entry at the same position are dropped, so
//! the emitted table only carries the keys a runtime cannot get from `*`.

use crate::catalog::TranslationConfig;
use crate::error::{FbtError, FbtResult};
use crate::hash::PatternHash;
use crate::metadata::AxisMetadata;
use crate::site::PhraseSite;
use crate::tokens::replace_clear_tokens_with_aliases;
use crate::translation::TranslationRecord;
use crate::tree::JsFbtTree;
use crate::variations::{EXACTLY_ONE, VIEWING_USER, VariationMask, WILDCARD};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Translations of one locale, keyed by leaf hash
pub type HashToTranslation = HashMap<PatternHash, TranslationRecord>;

/// Marker key of tables whose first level follows the viewer's gender
pub const VIEWER_GENDER_MARKER: &str = "__vcg";

/// Resolution behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveOptions {
    /// Missing translations and undeclared-token variations abort the locale
    pub strict: bool,
    /// Emit leaves as `[translation, hash]`
    pub include_hash: bool,
}

impl ResolveOptions {
    /// Fail on a missing record or on an entry varying on an undeclared
    /// token, instead of falling back with a diagnostic
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Pair every emitted translation with its leaf hash
    pub fn with_include_hash(mut self, include_hash: bool) -> Self {
        self.include_hash = include_hash;
        self
    }
}

/// Locale-specific table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationTree {
    Text(String),
    /// Translation coupled with its source hash for impression logging
    Hashed { text: String, hash: PatternHash },
    Branch(BTreeMap<String, TranslationTree>),
}

impl Serialize for TranslationTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TranslationTree::Text(text) => serializer.serialize_str(text),
            TranslationTree::Hashed { text, hash } => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(text)?;
                seq.serialize_element(hash)?;
                seq.end()
            }
            TranslationTree::Branch(children) => children.serialize(serializer),
        }
    }
}

/// Resolved table of one phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub tree: TranslationTree,
    /// The first level was injected for the viewer's gender
    pub viewer_gender: bool,
}

impl Serialize for TranslationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (&self.tree, self.viewer_gender) {
            (TranslationTree::Branch(children), true) => {
                let mut map = serializer.serialize_map(Some(children.len() + 1))?;
                for (key, child) in children {
                    map.serialize_entry(key, child)?;
                }
                map.serialize_entry(VIEWER_GENDER_MARKER, &1)?;
                map.end()
            }
            (tree, _) => tree.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// No record for a leaf hash; the source text was used
    MissingTranslation,
    /// A record exists but none of its entries is a default variation
    NoDefaultTranslation,
    /// An entry constrained a token the phrase does not vary on
    PrunedVariation,
}

/// Non-fatal finding of a resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub locale: String,
    pub hash: PatternHash,
    pub message: String,
}

/// Result of resolving one phrase for one locale
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub result: TranslationResult,
    pub diagnostics: Vec<Diagnostic>,
}

type ConstraintMap = HashMap<String, String>;

/// `token%value` pairs joined by `:`, e.g. `user%2:count%24`
pub fn build_constraint_key<T: AsRef<str>, V: AsRef<str>>(pairs: &[(T, V)]) -> String {
    pairs
        .iter()
        .map(|(token, value)| format!("{}%{}", token.as_ref(), value.as_ref()))
        .collect::<Vec<_>>()
        .join(":")
}

/// Resolves one phrase site against one locale's translations.
///
/// The constraint map cache depends on the phrase's tokens, so a resolver
/// is built per phrase and per locale and never shared.
pub struct TranslationResolver<'a> {
    site: &'a PhraseSite,
    translations: &'a HashToTranslation,
    config: &'a TranslationConfig,
    options: ResolveOptions,
    metadata: Vec<Option<AxisMetadata>>,
    table: JsFbtTree<PatternHash>,
    /// Masked tokens in level order
    token_masks: Vec<(String, VariationMask)>,
    viewer_gender: bool,
    cache: HashMap<PatternHash, ConstraintMap>,
    diagnostics: Vec<Diagnostic>,
    reported: HashSet<(DiagnosticKind, PatternHash)>,
}

impl<'a> TranslationResolver<'a> {
    pub fn new(
        site: &'a PhraseSite,
        translations: &'a HashToTranslation,
        config: &'a TranslationConfig,
        options: ResolveOptions,
    ) -> Self {
        let mut metadata = site.metadata().to_vec();
        let mut table = site.table().clone();

        let declared = |token: &str| {
            metadata
                .iter()
                .flatten()
                .any(|m| m.masked_token().is_some_and(|(t, _)| t == token))
        };
        let viewer_gender = !declared(VIEWING_USER)
            && site.hash_to_leaf().keys().any(|hash| {
                translations
                    .get(hash)
                    .is_some_and(|record| record.tokens.iter().any(|t| t == VIEWING_USER))
            });
        if viewer_gender {
            tracing::debug!(
                locale = config.locale(),
                "injecting hidden viewer gender variation"
            );
            let mut wrapper = BTreeMap::new();
            wrapper.insert(WILDCARD.to_string(), table);
            table = JsFbtTree::Branch(wrapper);
            metadata.insert(
                0,
                Some(AxisMetadata::Gender {
                    token: VIEWING_USER.to_string(),
                }),
            );
        }

        let token_masks = metadata
            .iter()
            .flatten()
            .filter_map(AxisMetadata::masked_token)
            .map(|(token, mask)| (token.to_string(), mask))
            .collect();

        TranslationResolver {
            site,
            translations,
            config,
            options,
            metadata,
            table,
            token_masks,
            viewer_gender,
            cache: HashMap::new(),
            diagnostics: Vec::new(),
            reported: HashSet::new(),
        }
    }

    /// True when at least one leaf of the phrase has a translation
    pub fn has_translations(&self) -> bool {
        self.site.hash_to_leaf().keys().any(|hash| {
            self.translations
                .get(hash)
                .is_some_and(TranslationRecord::has_translation)
        })
    }

    /// Rebuild the site's table with this locale's translations.
    ///
    /// Masked levels are expanded over the locale's categories: `*` covers
    /// every category without its own source key, and explicit category
    /// keys take the translation recorded for that category. Entries that
    /// render like `*` are then dropped, except `_1`.
    ///
    /// # Returns
    /// * `Ok(Resolution)` - The locale table plus diagnostics for fallbacks
    /// * `Err(FbtError)` - If a record is malformed, or in strict mode if a
    ///   translation is missing
    pub fn build(mut self) -> FbtResult<Resolution> {
        let table = std::mem::replace(&mut self.table, JsFbtTree::new_branch());
        let mut constraints = BTreeMap::new();
        let tree = self
            .build_recursive(&table, &mut constraints, 0)?
            .unwrap_or_else(|| TranslationTree::Branch(BTreeMap::new()));
        Ok(Resolution {
            result: TranslationResult {
                tree,
                viewer_gender: self.viewer_gender,
            },
            diagnostics: self.diagnostics,
        })
    }

    fn level_mask(&self, level: usize) -> Option<(String, VariationMask)> {
        self.metadata
            .get(level)
            .and_then(Option::as_ref)
            .and_then(AxisMetadata::masked_token)
            .map(|(token, mask)| (token.to_string(), mask))
    }

    fn build_recursive(
        &mut self,
        node: &JsFbtTree<PatternHash>,
        constraints: &mut BTreeMap<String, String>,
        level: usize,
    ) -> FbtResult<Option<TranslationTree>> {
        let children = match node {
            JsFbtTree::Leaf(hash) => return self.leaf_translation(hash, constraints),
            JsFbtTree::Branch(children) => children,
        };

        let masked = self.level_mask(level);
        let mut table = BTreeMap::new();
        for (key, child) in children {
            let unconstrained = self.build_recursive(child, constraints, level + 1)?;
            let Some((token, mask)) = masked.as_ref().filter(|_| key != EXACTLY_ONE) else {
                if let Some(translation) = unconstrained {
                    table.insert(key.clone(), translation);
                }
                continue;
            };

            if key != WILDCARD {
                // an explicit category key renders its own leaf for that category
                let constrained = self.build_constrained(child, constraints, level, token, key)?;
                if let Some(translation) = merge_translations(unconstrained, constrained) {
                    table.insert(key.clone(), translation);
                }
                continue;
            }

            if let Some(translation) = unconstrained {
                table.insert(key.clone(), translation);
            }
            // the wildcard covers every locale category without its own source key
            for variation in self.config.variations_for(*mask) {
                if children.contains_key(&variation) {
                    continue;
                }
                if let Some(translation) =
                    self.build_constrained(child, constraints, level, token, &variation)?
                {
                    table.insert(variation, translation);
                }
            }
        }

        if let Some((_, mask)) = masked {
            promote_default_category(&mut table, &self.config.default_variation(mask));
            drop_redundant_categories(&mut table);
            collapse_uniform_branch(&mut table);
        }
        Ok((!table.is_empty()).then_some(TranslationTree::Branch(table)))
    }

    /// Build `node` with `token` bound to `value`
    fn build_constrained(
        &mut self,
        node: &JsFbtTree<PatternHash>,
        constraints: &mut BTreeMap<String, String>,
        level: usize,
        token: &str,
        value: &str,
    ) -> FbtResult<Option<TranslationTree>> {
        let previous = constraints.insert(token.to_string(), value.to_string());
        let result = self.build_recursive(node, constraints, level + 1);
        match previous {
            Some(previous) => constraints.insert(token.to_string(), previous),
            None => constraints.remove(token),
        };
        result
    }

    fn leaf_translation(
        &mut self,
        hash: &PatternHash,
        constraints: &BTreeMap<String, String>,
    ) -> FbtResult<Option<TranslationTree>> {
        let translation = if constraints.is_empty() {
            Some(self.default_translation(hash)?)
        } else {
            self.constrained_translation(hash, constraints)?
        };

        Ok(translation.map(|text| {
            let text = match self.site.token_aliases(hash) {
                Some(aliases) => replace_clear_tokens_with_aliases(&text, aliases),
                None => text,
            };
            if self.options.include_hash {
                TranslationTree::Hashed {
                    text,
                    hash: hash.clone(),
                }
            } else {
                TranslationTree::Text(text)
            }
        }))
    }

    /// Default translation, or the source text when there is none
    fn default_translation(&mut self, hash: &PatternHash) -> FbtResult<String> {
        let source = self.site.source_text(hash).unwrap_or_default().to_string();
        let Some(record) = self.translations.get(hash) else {
            if self.options.strict {
                return Err(FbtError::MissingTranslation {
                    locale: self.config.locale().to_string(),
                    hash: hash.clone(),
                });
            }
            self.report(
                DiagnosticKind::MissingTranslation,
                hash,
                format!(
                    "Missing {} translation for string ({})",
                    self.config.locale(),
                    hash
                ),
            );
            return Ok(source);
        };
        record.validate(hash)?;
        match record.default_translation(self.config) {
            Some(translation) => Ok(translation.to_string()),
            None => {
                self.report(
                    DiagnosticKind::NoDefaultTranslation,
                    hash,
                    format!(
                        "No default {} translation for string ({}); using source text",
                        self.config.locale(),
                        hash
                    ),
                );
                Ok(source)
            }
        }
    }

    /// Translation for `constraints`, or `None` when the wildcard entry at
    /// the same position already renders the same text
    fn constrained_translation(
        &mut self,
        hash: &PatternHash,
        constraints: &BTreeMap<String, String>,
    ) -> FbtResult<Option<String>> {
        self.ensure_constraint_map(hash)?;
        let Some(map) = self.cache.get(hash) else {
            return Ok(None);
        };

        let mut pairs: Vec<(&str, &str)> = self
            .token_masks
            .iter()
            .map(|(token, _)| {
                let value = constraints.get(token).map_or(WILDCARD, String::as_str);
                (token.as_str(), value)
            })
            .collect();
        let Some(translation) = map.get(&build_constraint_key(&pairs)) else {
            return Ok(None);
        };

        for i in 0..pairs.len() {
            let value = pairs[i].1;
            if value == WILDCARD {
                continue;
            }
            pairs[i].1 = WILDCARD;
            if map.get(&build_constraint_key(&pairs)) == Some(translation) {
                return Ok(None);
            }
            pairs[i].1 = value;
        }
        Ok(Some(translation.clone()))
    }

    fn ensure_constraint_map(&mut self, hash: &PatternHash) -> FbtResult<()> {
        if self.cache.contains_key(hash) {
            return Ok(());
        }
        let mut map = ConstraintMap::new();
        let Some(record) = self.translations.get(hash) else {
            self.cache.insert(hash.clone(), map);
            return Ok(());
        };
        record.validate(hash)?;

        'entries: for entry in &record.translations {
            let mut entry_constraints: HashMap<&str, String> = HashMap::new();
            for (index, value) in &entry.variations {
                let (token, record_mask) = record.token_at(hash, index)?;
                let value_key = value.as_key();
                let phrase_mask = self
                    .token_masks
                    .iter()
                    .find(|(t, _)| t == token)
                    .map(|(_, mask)| *mask);
                let varies = phrase_mask.is_some() && phrase_mask == record_mask;
                if !varies && !self.config.is_default_variation(&value_key) {
                    if self.options.strict {
                        return Err(FbtError::MalformedRecord {
                            hash: hash.clone(),
                            reason: format!(
                                "translation varies on `{}`={} which the phrase does not declare",
                                token, value_key
                            ),
                        });
                    }
                    tracing::warn!(
                        hash = %hash,
                        token = token,
                        value = %value_key,
                        "pruning translation entry for undeclared variation"
                    );
                    self.diagnostics.push(Diagnostic {
                        kind: DiagnosticKind::PrunedVariation,
                        locale: self.config.locale().to_string(),
                        hash: hash.clone(),
                        message: format!(
                            "Pruned translation varying on undeclared token `{}` ({})",
                            token, value_key
                        ),
                    });
                    continue 'entries;
                }
                entry_constraints.insert(token, value_key);
            }

            let mut pairs: Vec<(String, String)> = self
                .token_masks
                .iter()
                .map(|(token, _)| {
                    let value = entry_constraints
                        .get(token.as_str())
                        .cloned()
                        .unwrap_or_else(|| WILDCARD.to_string());
                    (token.clone(), value)
                })
                .collect();
            insert_constraint(&mut pairs, &mut map, &entry.translation, 0, self.config)?;
        }
        self.cache.insert(hash.clone(), map);
        Ok(())
    }

    fn report(&mut self, kind: DiagnosticKind, hash: &PatternHash, message: String) {
        if !self.reported.insert((kind, hash.clone())) {
            return;
        }
        tracing::warn!(locale = self.config.locale(), hash = %hash, "{}", message);
        self.diagnostics.push(Diagnostic {
            kind,
            locale: self.config.locale().to_string(),
            hash: hash.clone(),
            message,
        });
    }
}

/// Register `translation` under `pairs`, and under every key where a
/// default-valued token from `defaulting_level` on is replaced by `*`
fn insert_constraint(
    pairs: &mut [(String, String)],
    map: &mut ConstraintMap,
    translation: &str,
    defaulting_level: usize,
    config: &TranslationConfig,
) -> FbtResult<()> {
    let key = build_constraint_key(pairs);
    if let Some(original) = map.get(&key) {
        return Err(FbtError::DuplicateConstraint {
            key,
            original: original.clone(),
            new: translation.to_string(),
        });
    }
    map.insert(key, translation.to_string());

    for i in defaulting_level..pairs.len() {
        let value = pairs[i].1.clone();
        if value != WILDCARD && config.is_default_variation(&value) {
            pairs[i].1 = WILDCARD.to_string();
            insert_constraint(pairs, map, translation, i + 1, config)?;
            pairs[i].1 = value;
        }
    }
    Ok(())
}

/// Overlay `overlay` onto `base`, entry by entry for branches
fn merge_translations(
    base: Option<TranslationTree>,
    overlay: Option<TranslationTree>,
) -> Option<TranslationTree> {
    match (base, overlay) {
        (Some(TranslationTree::Branch(mut base)), Some(TranslationTree::Branch(overlay))) => {
            for (key, value) in overlay {
                if let Some(merged) = merge_translations(base.remove(&key), Some(value)) {
                    base.insert(key, merged);
                }
            }
            Some(TranslationTree::Branch(base))
        }
        (base, None) => base,
        (_, overlay) => overlay,
    }
}

/// Without a `*` entry, the locale's default category serves as `*`
fn promote_default_category(table: &mut BTreeMap<String, TranslationTree>, default: &str) {
    if table.contains_key(WILDCARD) {
        return;
    }
    if let Some(translation) = table.remove(default) {
        table.insert(WILDCARD.to_string(), translation);
    }
}

/// Category entries equal to `*` are left to the runtime fallback; `_1` is
/// looked up before any category and always stays
fn drop_redundant_categories(table: &mut BTreeMap<String, TranslationTree>) {
    let Some(wildcard) = table.get(WILDCARD).cloned() else {
        return;
    };
    table.retain(|key, translation| {
        key == WILDCARD || key == EXACTLY_ONE || *translation != wildcard
    });
}

/// A masked level whose entries all render the same way needs only `*`
fn collapse_uniform_branch(table: &mut BTreeMap<String, TranslationTree>) {
    if table.len() < 2 {
        return;
    }
    let mut values = table.values();
    let uniform = match values.next() {
        Some(first) => values.all(|v| v == first),
        None => false,
    };
    if uniform {
        let value = std::mem::take(table).into_values().next();
        if let Some(value) = value {
            table.insert(WILDCARD.to_string(), value);
        }
    }
}

/// Resolve `site` for one locale
///
/// # Arguments
/// * `site` - The phrase table with leaves replaced by their hashes
/// * `translations` - The locale's records, keyed by leaf hash
/// * `config` - Categories and fallbacks of the target locale
/// * `options` - Strictness and hash inclusion
///
/// # Returns
/// * `Ok(Resolution)` - The translated table and any non-fatal diagnostics
/// * `Err(FbtError::MissingTranslation)` - In strict mode, if a leaf has no record
/// * `Err(FbtError)` - If a record is malformed or has duplicate constraints
pub fn resolve(
    site: &PhraseSite,
    translations: &HashToTranslation,
    config: &TranslationConfig,
    options: ResolveOptions,
) -> FbtResult<Resolution> {
    TranslationResolver::new(site, translations, config, options).build()
}
