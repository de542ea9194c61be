//! Packagers post-process collected phrases before they are handed to
//! translators.
//!
//! - [`TextPackager`] attaches `hashToLeaf`, the reverse lookup the
//!   translation stage uses to rebuild phrase sites.
//! - [`PhrasePackager`] attaches `hash_key`, the phrase hash key resolver
//!   output is keyed by.

use crate::artifacts::{CollectOutput, ExtractedPhrase};
use crate::error::{TranslateError, TranslateResult};
use jsfbt::site::hash_leaves;
use jsfbt::{PatternHasher, phrase_hash_key};

/// A pass over the collected phrases
pub trait Packager {
    fn pack(&self, phrases: Vec<ExtractedPhrase>) -> TranslateResult<Vec<ExtractedPhrase>>;
}

/// Attaches `hashToLeaf` to every phrase
#[derive(Debug, Clone, Default)]
pub struct TextPackager<H> {
    hasher: H,
}

impl<H: PatternHasher> TextPackager<H> {
    pub fn new(hasher: H) -> Self {
        Self { hasher }
    }
}

impl<H: PatternHasher> Packager for TextPackager<H> {
    fn pack(&self, mut phrases: Vec<ExtractedPhrase>) -> TranslateResult<Vec<ExtractedPhrase>> {
        tracing::debug!(
            version = self.hasher.version(),
            phrases = phrases.len(),
            "attaching hashToLeaf"
        );
        for (index, phrase) in phrases.iter_mut().enumerate() {
            let jsfbt = phrase
                .jsfbt
                .as_ref()
                .ok_or(TranslateError::MissingJsFbt { index })?;
            phrase.hash_to_leaf = Some(hash_leaves(&jsfbt.t, &self.hasher));
        }
        Ok(phrases)
    }
}

/// Attaches the phrase hash key to every phrase
#[derive(Debug, Clone, Copy, Default)]
pub struct PhrasePackager;

impl Packager for PhrasePackager {
    fn pack(&self, mut phrases: Vec<ExtractedPhrase>) -> TranslateResult<Vec<ExtractedPhrase>> {
        for (index, phrase) in phrases.iter_mut().enumerate() {
            let jsfbt = phrase
                .jsfbt
                .as_ref()
                .ok_or(TranslateError::MissingJsFbt { index })?;
            let key = phrase_hash_key(&jsfbt.t)
                .map_err(|source| TranslateError::Phrase { index, source })?;
            phrase.hash_key = Some(key);
        }
        Ok(phrases)
    }
}

/// Run `packagers` in order over the phrases of `output`
pub fn pack(output: CollectOutput, packagers: &[&dyn Packager]) -> TranslateResult<CollectOutput> {
    let CollectOutput {
        phrases,
        child_parent_mappings,
    } = output;
    let phrases = packagers
        .iter()
        .try_fold(phrases, |phrases, packager| packager.pack(phrases))?;
    Ok(CollectOutput {
        phrases,
        child_parent_mappings,
    })
}
