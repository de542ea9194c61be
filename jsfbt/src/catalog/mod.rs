//! Locale variation catalog: which plural and gender categories each locale
//! distinguishes, and which category it falls back to.

mod gender;
mod number;

pub use gender::GenderType;
pub use number::NumberType;

use crate::variations::VariationMask;
use std::collections::HashMap;

/// Pseudo locales that borrow the rules of a real language
const PSEUDO_LOCALE_LANGS: [(&str, &str); 1] = [("fb_HX", "en")];

/// Normalize a locale to `xx_YY` form
fn normalize_locale(locale: &str) -> String {
    locale.replace('-', "_")
}

/// Language of a locale: `fb_HX -> en`, `ru_RU -> ru`, `ru -> ru`
pub fn locale_to_lang(locale: &str) -> String {
    let locale = normalize_locale(locale);
    if let Some((_, lang)) = PSEUDO_LOCALE_LANGS.iter().find(|(l, _)| *l == locale) {
        return lang.to_string();
    }
    match locale.split_once('_') {
        Some((lang, _)) => lang.to_string(),
        None => locale,
    }
}

/// Leading integer of a variation value, if any (`"24"`, `" 4"`, `"3x"`)
fn parse_variation_code(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let sign_len = usize::from(value.starts_with(['-', '+']));
    let digits_len = value[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    value[..sign_len + digits_len].parse().ok()
}

/// Variation configuration of one locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationConfig {
    locale: String,
    number_type: NumberType,
    gender_type: GenderType,
}

impl TranslationConfig {
    pub fn new(locale: &str, number_type: NumberType, gender_type: GenderType) -> Self {
        TranslationConfig {
            locale: locale.to_string(),
            number_type,
            gender_type,
        }
    }

    /// Load the configuration of `locale` (`xx_YY`, `xx-YY` or `xx`).
    ///
    /// Locales without CLDR plural rules use the root number type.
    pub fn for_locale(locale: &str) -> Self {
        let normalized = normalize_locale(locale);
        let lang = locale_to_lang(&normalized);
        let tag = if PSEUDO_LOCALE_LANGS.iter().any(|(l, _)| *l == normalized) {
            lang.clone()
        } else {
            normalized.replace('_', "-")
        };
        let number_type = match NumberType::for_language_tag(&tag) {
            Ok(number_type) => number_type,
            Err(e) => {
                tracing::warn!(locale = %locale, error = %e, "falling back to root number type");
                NumberType::root()
            }
        };
        let gender_type = GenderType::for_locale(&normalized, &lang);
        TranslationConfig::new(&normalized, number_type, gender_type)
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn number_type(&self) -> &NumberType {
        &self.number_type
    }

    pub fn gender_type(&self) -> GenderType {
        self.gender_type
    }

    /// True when `value` is the locale's number or gender fallback code.
    /// The wildcard and non-numeric values are never default variations.
    pub fn is_default_variation(&self, value: &str) -> bool {
        parse_variation_code(value).is_some_and(|code| self.is_default_code(code))
    }

    pub fn is_default_code(&self, code: i64) -> bool {
        code == i64::from(self.number_type.fallback().code())
            || code == i64::from(self.gender_type.fallback().code())
    }

    /// Fallback category key of a variation family
    pub fn default_variation(&self, mask: VariationMask) -> String {
        match mask {
            VariationMask::Number => self.number_type.fallback().code().to_string(),
            VariationMask::Gender => self.gender_type.fallback().code().to_string(),
        }
    }

    /// Category keys the locale distinguishes for a variation family
    pub fn variations_for(&self, mask: VariationMask) -> Vec<String> {
        match mask {
            VariationMask::Number => self
                .number_type
                .variations()
                .iter()
                .map(|v| v.code().to_string())
                .collect(),
            VariationMask::Gender => self
                .gender_type
                .variations()
                .iter()
                .map(|g| g.code().to_string())
                .collect(),
        }
    }
}

/// Read-only set of locale configurations, shareable across threads
#[derive(Debug, Clone, Default)]
pub struct LocaleVariationCatalog {
    configs: HashMap<String, TranslationConfig>,
}

impl LocaleVariationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every locale in `locales`
    pub fn for_locales<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new();
        for locale in locales {
            catalog.insert(TranslationConfig::for_locale(locale.as_ref()));
        }
        catalog
    }

    pub fn insert(&mut self, config: TranslationConfig) {
        self.configs.insert(config.locale().to_string(), config);
    }

    pub fn get(&self, locale: &str) -> Option<&TranslationConfig> {
        self.configs.get(&normalize_locale(locale))
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variations::{Gender, NumberVariation};
    use rstest::rstest;

    #[rstest]
    #[case("fb_HX", "en")]
    #[case("ru_RU", "ru")]
    #[case("ru", "ru")]
    #[case("pt-BR", "pt")]
    fn test_locale_to_lang(#[case] locale: &str, #[case] lang: &str) {
        assert_eq!(locale_to_lang(locale), lang);
    }

    #[rstest]
    #[case("24", Some(24))]
    #[case("3", Some(3))]
    #[case("4abc", Some(4))]
    #[case("*", None)]
    #[case("", None)]
    #[case("photos", None)]
    fn test_parse_variation_code(#[case] value: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_variation_code(value), expected);
    }

    #[rstest]
    #[case("en_US", "24", true)]
    #[case("en_US", "3", true)]
    #[case("en_US", "4", false)]
    #[case("en_US", "1", false)]
    #[case("en_US", "*", false)]
    #[case("ru_RU", "12", true)]
    #[case("ru_RU", "24", false)]
    #[case("ar_AR", "1", true)]
    #[case("ar_AR", "3", false)]
    fn test_is_default_variation(#[case] locale: &str, #[case] value: &str, #[case] expected: bool) {
        let config = TranslationConfig::for_locale(locale);
        assert_eq!(config.is_default_variation(value), expected);
    }

    #[test]
    fn test_pseudo_locale_uses_english_rules() {
        let config = TranslationConfig::for_locale("fb_HX");
        assert_eq!(
            config.number_type().variations(),
            &[NumberVariation::One, NumberVariation::Other]
        );
    }

    #[test]
    fn test_unknown_locale_falls_back_to_root() {
        let config = TranslationConfig::for_locale("%%");
        assert_eq!(config.number_type(), &NumberType::root());
        assert_eq!(config.gender_type().fallback(), Gender::Unknown);
    }

    #[test]
    fn test_variations_for_mask() {
        let config = TranslationConfig::for_locale("fr_FR");
        assert_eq!(config.variations_for(VariationMask::Gender), vec!["3", "1", "2"]);
        assert_eq!(config.variations_for(VariationMask::Number), vec!["4", "24"]);
    }

    #[rstest]
    #[case("en_US", VariationMask::Number, "24")]
    #[case("ru_RU", VariationMask::Number, "12")]
    #[case("fr_FR", VariationMask::Gender, "3")]
    #[case("lv_LV", VariationMask::Gender, "1")]
    fn test_default_variation(#[case] locale: &str, #[case] mask: VariationMask, #[case] expected: &str) {
        let config = TranslationConfig::for_locale(locale);
        assert_eq!(config.default_variation(mask), expected);
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = LocaleVariationCatalog::for_locales(["en_US", "ru-RU"]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("ru_RU").is_some());
        assert!(catalog.get("en-US").is_some());
        assert!(catalog.get("de_DE").is_none());
    }
}
