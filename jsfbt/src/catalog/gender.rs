//! Grammatical gender classification of a locale.

use crate::variations::Gender;

const MERGED_UNKNOWN_LOCALES: [&str; 9] = [
    "ar_AR", "ks_IN", "lv_LV", "ps_AF", "qk_DZ", "qs_DE", "qv_IT", "sq_AL", "ti_ET",
];

const MERGED_UNKNOWN_LANGS: [&str; 9] = ["ar", "dsb", "kab", "ks", "lv", "ps", "sq", "ti", "vec"];

/// Gender categories a locale distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderType {
    /// Male, female and unknown are translated separately
    Default,
    /// Unknown gender is rendered with the male form
    MergedUnknown,
}

impl GenderType {
    /// `locale` in `xx_YY` form, `lang` its language
    pub fn for_locale(locale: &str, lang: &str) -> Self {
        if MERGED_UNKNOWN_LOCALES.contains(&locale) || MERGED_UNKNOWN_LANGS.contains(&lang) {
            GenderType::MergedUnknown
        } else {
            GenderType::Default
        }
    }

    pub fn variations(self) -> &'static [Gender] {
        match self {
            GenderType::Default => &[Gender::Unknown, Gender::Male, Gender::Female],
            GenderType::MergedUnknown => &[Gender::Male, Gender::Female],
        }
    }

    pub fn fallback(self) -> Gender {
        match self {
            GenderType::Default => Gender::Unknown,
            GenderType::MergedUnknown => Gender::Male,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en_US", "en", GenderType::Default)]
    #[case("ar_AR", "ar", GenderType::MergedUnknown)]
    #[case("qk_DZ", "qk", GenderType::MergedUnknown)]
    #[case("vec_IT", "vec", GenderType::MergedUnknown)]
    #[case("fr_FR", "fr", GenderType::Default)]
    fn test_gender_type(#[case] locale: &str, #[case] lang: &str, #[case] expected: GenderType) {
        assert_eq!(GenderType::for_locale(locale, lang), expected);
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(GenderType::Default.fallback(), Gender::Unknown);
        assert_eq!(GenderType::MergedUnknown.fallback(), Gender::Male);
        assert!(!GenderType::MergedUnknown.variations().contains(&Gender::Unknown));
    }
}
