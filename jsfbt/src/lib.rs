//! Variation tables and translation resolution for fbt-style phrases.
//!
//! A phrase that varies at runtime (by count, gender, enum choice or
//! pronoun) is compiled into a JSFBT table: nested variation keys ending in
//! one rendered leaf per combination. Translations are stored flat, keyed by
//! the content hash of each leaf, and are turned back into a locale-specific
//! table by the [`TranslationResolver`].
//!
//! # Example
//!
//! ```ignore
//! use jsfbt::{
//!     HashAlgorithm, JsFbtLeaf, PhraseSite, ResolveOptions, TranslationConfig,
//!     VariationAxis, assemble, enumerate, resolve,
//! };
//!
//! let axes = vec![VariationAxis::plural(Some("count"), "photos.length", &[])?];
//! let jsfbt = assemble(&enumerate(&axes)?, |combination| {
//!     Ok(JsFbtLeaf::new(format!("{:?}", combination.key_path()), "photos"))
//! })?;
//! let site = PhraseSite::from_jsfbt(&jsfbt, "app", &HashAlgorithm::default())?;
//! let config = TranslationConfig::for_locale("ru_RU");
//! let resolution = resolve(&site, &translations, &config, ResolveOptions::default())?;
//! println!("{}", serde_json::to_string(&resolution.result)?);
//! ```

pub mod assemble;
pub mod axis;
pub mod catalog;
pub mod enumerate;
pub mod error;
pub mod hash;
pub mod metadata;
pub mod resolver;
pub mod site;
pub mod tokens;
pub mod translation;
pub mod tree;
pub mod variations;

// Re-export main types for convenient access
pub use assemble::assemble;
pub use axis::{
    AxisValue, GenderValue, NumberValue, PronounGender, PronounValue, VariationAxis,
    VariationKind,
};
pub use catalog::{
    GenderType, LocaleVariationCatalog, NumberType, TranslationConfig, locale_to_lang,
};
pub use enumerate::{
    Binding, Combination, EnumerateOptions, Enumeration, enumerate, enumerate_with_options,
};
pub use error::{FbtError, FbtResult};
pub use hash::{HashAlgorithm, PatternHash, PatternHasher, phrase_hash_key};
pub use metadata::AxisMetadata;
pub use resolver::{
    Diagnostic, DiagnosticKind, HashToTranslation, Resolution, ResolveOptions,
    TranslationResolver, TranslationResult, TranslationTree, resolve,
};
pub use site::{HashedLeaf, PhraseSite};
pub use translation::{TranslationEntry, TranslationRecord, VariationValue};
pub use tree::{JsFbt, JsFbtLeaf, JsFbtTree};
pub use variations::{Gender, NumberVariation, VariationMask, VariationType};
