//! Variation codes shared by the table builder and the translation resolver.
//!
//! Number categories and genders are identified by fixed integer codes. The
//! codes are laid out so that a [`VariationMask`] selects the bits belonging to
//! one variation family: genders live in the low two bits, number categories
//! in bits 2..5.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wildcard branch key: "any value", used as the fallback entry of a branch
pub const WILDCARD: &str = "*";

/// Branch key for the exactly-one (singular) number value
pub const EXACTLY_ONE: &str = "_1";

/// Reserved token for the gender of the viewing user
pub const VIEWING_USER: &str = "__viewing_user__";

/// CLDR plural categories with their variation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumberVariation {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl NumberVariation {
    pub const ALL: [NumberVariation; 6] = [
        NumberVariation::Zero,
        NumberVariation::One,
        NumberVariation::Two,
        NumberVariation::Few,
        NumberVariation::Many,
        NumberVariation::Other,
    ];

    pub fn code(self) -> u8 {
        match self {
            NumberVariation::Zero => 16,
            NumberVariation::One => 4,
            NumberVariation::Two => 8,
            NumberVariation::Few => 20,
            NumberVariation::Many => 12,
            NumberVariation::Other => 24,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|v| i64::from(v.code()) == code)
    }
}

impl fmt::Display for NumberVariation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Grammatical gender codes of a gender variation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Unknown];

    pub fn code(self) -> u8 {
        match self {
            Gender::Male => 1,
            Gender::Female => 2,
            Gender::Unknown => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|g| i64::from(g.code()) == code)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Kind of a metadata level, as encoded in the `type` field of axis metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VariationType {
    Gender,
    Number,
    Pronoun,
}

impl From<VariationType> for u8 {
    fn from(value: VariationType) -> u8 {
        match value {
            VariationType::Gender => 1,
            VariationType::Number => 2,
            VariationType::Pronoun => 3,
        }
    }
}

impl TryFrom<u8> for VariationType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VariationType::Gender),
            2 => Ok(VariationType::Number),
            3 => Ok(VariationType::Pronoun),
            other => Err(format!("unknown variation type {}", other)),
        }
    }
}

/// Bit mask selecting one variation family out of a variation code.
///
/// Translation records list one mask per token in their `types` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VariationMask {
    Gender,
    Number,
}

impl VariationMask {
    pub fn bits(self) -> u8 {
        match self {
            VariationMask::Gender => 3,
            VariationMask::Number => 28,
        }
    }

    /// Mask of a metadata level type. Pronoun levels are not masked.
    pub fn for_type(variation_type: VariationType) -> Option<Self> {
        match variation_type {
            VariationType::Gender => Some(VariationMask::Gender),
            VariationType::Number => Some(VariationMask::Number),
            VariationType::Pronoun => None,
        }
    }
}

impl From<VariationMask> for u8 {
    fn from(value: VariationMask) -> u8 {
        value.bits()
    }
}

impl TryFrom<u8> for VariationMask {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(VariationMask::Gender),
            28 => Ok(VariationMask::Number),
            other => Err(format!("unknown variation mask {}", other)),
        }
    }
}
