//! Packaging and multi-locale translation of collected jsfbt phrases
//!
//! This crate sits between the extraction stage and the runtime: it attaches
//! leaf hashes to collected phrases and turns translation groups into
//! locale-specific tables with [`jsfbt::resolve`].
//!
//! # Workflow Example
//!
//! ```ignore
//! use jsfbt::HashAlgorithm;
//! use jsfbt_translate::{
//!     CollectOutput, PhrasePackager, TextPackager, TranslateInput, TranslateOptions, pack, translate,
//! };
//!
//! // 1. Attach hashToLeaf (and phrase hash keys) to the collect output
//! let collected: CollectOutput = serde_json::from_str(&collect_json)?;
//! let packed = pack(collected, &[&TextPackager::new(HashAlgorithm::default()), &PhrasePackager])?;
//!
//! // 2. Translators fill one translation group per locale, keyed by leaf hash
//! let input = TranslateInput { phrases: packed.phrases, translation_groups };
//!
//! // 3. Resolve every phrase for every locale
//! let report = translate(&input, &TranslateOptions::default().with_key_by_phrase_hash(true))?;
//! for failure in &report.failures {
//!     eprintln!("{}: {}", failure.locale, failure.error);
//! }
//! println!("{}", serde_json::to_string(&report.output)?);
//! ```

pub mod artifacts;
pub mod error;
pub mod options;
pub mod packager;
pub mod pipeline;


// Re-export main types for convenient access
pub use artifacts::{
    CollectOutput, ExtractedPhrase, HashToLeaf, TranslateInput, TranslateOutput, TranslatedGroup,
    TranslationGroup,
};
pub use error::{TranslateError, TranslateResult};
pub use options::TranslateOptions;
pub use packager::{Packager, PhrasePackager, TextPackager, pack};
pub use pipeline::{
    LocaleFailure, TranslateReport, build_sites, check_and_filter_translations,
    process_translations, translate, translate_json, translate_with_catalog,
};
