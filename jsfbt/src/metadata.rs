//! Per-level descriptors of a variation table.
//!
//! JSON encoding:
//!
//! ```text
//! number   {"type": 2, "token": "count", "singular": true}
//! gender   {"type": 1, "token": "name"}
//! pronoun  {"type": 3}
//! enum     {"range": ["groups", "photos"]}
//! ```
//!
//! A `null` entry in the metadata array marks a level with no variation mask.

use crate::error::FbtError;
use crate::variations::{VariationMask, VariationType};
use serde::{Deserialize, Serialize};

/// Descriptor of one level of a variation table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAxisMetadata", into = "RawAxisMetadata")]
pub enum AxisMetadata {
    Number { token: Option<String>, singular: bool },
    Gender { token: String },
    Pronoun,
    Enum { range: Vec<String> },
}

impl AxisMetadata {
    pub fn variation_type(&self) -> Option<VariationType> {
        match self {
            AxisMetadata::Number { .. } => Some(VariationType::Number),
            AxisMetadata::Gender { .. } => Some(VariationType::Gender),
            AxisMetadata::Pronoun => Some(VariationType::Pronoun),
            AxisMetadata::Enum { .. } => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            AxisMetadata::Number { token, .. } => token.as_deref(),
            AxisMetadata::Gender { token } => Some(token),
            AxisMetadata::Pronoun | AxisMetadata::Enum { .. } => None,
        }
    }

    pub fn variation_mask(&self) -> Option<VariationMask> {
        self.variation_type().and_then(VariationMask::for_type)
    }

    /// Token and mask of a level the resolver expands per locale.
    ///
    /// A number level without a token has nothing to constrain and is
    /// treated as unmasked.
    pub fn masked_token(&self) -> Option<(&str, VariationMask)> {
        match (self.token(), self.variation_mask()) {
            (Some(token), Some(mask)) => Some((token, mask)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawAxisMetadata {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    variation_type: Option<VariationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    singular: bool,
}

impl TryFrom<RawAxisMetadata> for AxisMetadata {
    type Error = FbtError;

    fn try_from(raw: RawAxisMetadata) -> Result<Self, Self::Error> {
        match raw.variation_type {
            None => match raw.range {
                Some(range) => Ok(AxisMetadata::Enum { range }),
                None => Err(FbtError::InvalidMetadata(
                    "an entry without type must be an enum and carry a range".to_string(),
                )),
            },
            Some(VariationType::Number) => Ok(AxisMetadata::Number {
                token: raw.token,
                singular: raw.singular,
            }),
            Some(VariationType::Gender) => match raw.token {
                Some(token) => Ok(AxisMetadata::Gender { token }),
                None => Err(FbtError::InvalidMetadata(
                    "token should be specified for gender variation".to_string(),
                )),
            },
            Some(VariationType::Pronoun) => match raw.token {
                None => Ok(AxisMetadata::Pronoun),
                Some(token) => Err(FbtError::InvalidMetadata(format!(
                    "token should not be specified for pronoun variation (got `{}`)",
                    token
                ))),
            },
        }
    }
}

impl From<AxisMetadata> for RawAxisMetadata {
    fn from(metadata: AxisMetadata) -> Self {
        match metadata {
            AxisMetadata::Number { token, singular } => RawAxisMetadata {
                variation_type: Some(VariationType::Number),
                token,
                singular,
                ..Default::default()
            },
            AxisMetadata::Gender { token } => RawAxisMetadata {
                variation_type: Some(VariationType::Gender),
                token: Some(token),
                ..Default::default()
            },
            AxisMetadata::Pronoun => RawAxisMetadata {
                variation_type: Some(VariationType::Pronoun),
                ..Default::default()
            },
            AxisMetadata::Enum { range } => RawAxisMetadata {
                range: Some(range),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_round_trip() {
        let metadata = AxisMetadata::Number {
            token: Some("count".to_string()),
            singular: true,
        };
        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value, json!({"type": 2, "token": "count", "singular": true}));
        let back: AxisMetadata = serde_json::from_value(value).unwrap();
        assert_eq!(back, metadata);
    }

    #[test]
    fn test_enum_and_pronoun_encoding() {
        let value = serde_json::to_value(AxisMetadata::Enum {
            range: vec!["a".to_string()],
        })
        .unwrap();
        assert_eq!(value, json!({"range": ["a"]}));
        assert_eq!(
            serde_json::to_value(AxisMetadata::Pronoun).unwrap(),
            json!({"type": 3})
        );
    }

    #[test]
    fn test_null_entries_accepted() {
        let levels: Vec<Option<AxisMetadata>> =
            serde_json::from_value(json!([null, {"type": 1, "token": "name"}])).unwrap();
        assert_eq!(levels[0], None);
        assert_eq!(
            levels[1].as_ref().and_then(AxisMetadata::masked_token),
            Some(("name", VariationMask::Gender))
        );
    }

    #[test]
    fn test_invalid_entries_rejected() {
        assert!(serde_json::from_value::<AxisMetadata>(json!({"type": 1})).is_err());
        assert!(serde_json::from_value::<AxisMetadata>(json!({"type": 3, "token": "x"})).is_err());
        assert!(serde_json::from_value::<AxisMetadata>(json!({})).is_err());
    }

    #[test]
    fn test_masks() {
        let untokened = AxisMetadata::Number {
            token: None,
            singular: false,
        };
        assert_eq!(untokened.variation_mask(), Some(VariationMask::Number));
        assert_eq!(untokened.masked_token(), None);
        assert_eq!(AxisMetadata::Pronoun.variation_mask(), None);
    }
}
