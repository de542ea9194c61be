//! Number (plural) classification of a locale, derived from CLDR.

use crate::error::{FbtError, FbtResult};
use crate::variations::NumberVariation;
use icu_locale::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};

/// Integer sample values that land in each plural category for some language,
/// in the order of [`NumberVariation::ALL`]
const SAMPLES_BY_CATEGORY: [(PluralCategory, &[usize]); 6] = [
    (PluralCategory::Zero, &[0]),
    (PluralCategory::One, &[1, 21, 31, 41]),
    (PluralCategory::Two, &[2, 22, 32]),
    (PluralCategory::Few, &[3, 4, 23, 24]),
    (PluralCategory::Many, &[5, 11, 101]),
    (PluralCategory::Other, &[6, 7, 8, 9, 10, 25, 100, 1000]),
];

/// Plural categories a locale distinguishes, and the one used when a
/// translation does not say
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberType {
    variations: Vec<NumberVariation>,
    fallback: NumberVariation,
}

impl NumberType {
    /// Root classification: a single `other` category
    pub fn root() -> Self {
        NumberType {
            variations: vec![NumberVariation::Other],
            fallback: NumberVariation::Other,
        }
    }

    /// Classify a BCP-47 language tag using the CLDR cardinal rules
    pub fn for_language_tag(tag: &str) -> FbtResult<Self> {
        let locale: Locale = tag
            .parse()
            .map_err(|e| FbtError::InvalidLocale(format!("Failed to parse locale '{}': {}", tag, e)))?;
        let rules = PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into())
            .map_err(|e| {
                FbtError::InvalidLocale(format!(
                    "Failed to create PluralRules for locale '{}': {}",
                    tag, e
                ))
            })?;

        let mut variations = Vec::new();
        let mut other_has_integers = false;
        for ((expected, samples), variation) in SAMPLES_BY_CATEGORY.iter().zip(NumberVariation::ALL) {
            let used = samples
                .iter()
                .any(|&sample| rules.category_for(sample) == *expected);
            if used {
                variations.push(variation);
                if variation == NumberVariation::Other {
                    other_has_integers = true;
                }
            }
        }
        // `other` is always a valid translation key, even when only
        // fractional values select it
        if !other_has_integers {
            variations.push(NumberVariation::Other);
        }

        let fallback = if other_has_integers || !variations.contains(&NumberVariation::Many) {
            NumberVariation::Other
        } else {
            NumberVariation::Many
        };
        Ok(NumberType {
            variations,
            fallback,
        })
    }

    pub fn variations(&self) -> &[NumberVariation] {
        &self.variations
    }

    pub fn fallback(&self) -> NumberVariation {
        self.fallback
    }
}
