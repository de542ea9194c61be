//! Variation axes: one dimension of runtime variation attached to a phrase.
//!
//! An axis is built once per variation argument by the extraction stage and
//! consumed read-only by the [enumerator](crate::enumerate). Each axis knows
//! its kind, the finite list of values it may take, the placeholder token it
//! feeds (if any) and the identity of the runtime expression it is bound to.

use crate::error::{FbtError, FbtResult};
use crate::metadata::AxisMetadata;
use crate::variations::{EXACTLY_ONE, Gender, NumberVariation, WILDCARD};
use std::fmt;

/// Closed set of variation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VariationKind {
    Number,
    Gender,
    Enum,
    Pronoun,
}

impl fmt::Display for VariationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VariationKind::Number => "number",
            VariationKind::Gender => "gender",
            VariationKind::Enum => "enum",
            VariationKind::Pronoun => "pronoun",
        };
        f.write_str(name)
    }
}

/// Candidate value of a number axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberValue {
    Any,
    ExactlyOne,
    /// Extended CLDR category (zero, two, few, ...)
    Category(NumberVariation),
}

/// Candidate value of a gender axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenderValue {
    Any,
    Gender(Gender),
}

/// Gender constants understood by pronoun variations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PronounGender {
    NotAPerson,
    Female,
    Male,
    UnknownSingular,
    UnknownPlural,
}

impl PronounGender {
    pub const ALL: [PronounGender; 5] = [
        PronounGender::NotAPerson,
        PronounGender::Female,
        PronounGender::Male,
        PronounGender::UnknownSingular,
        PronounGender::UnknownPlural,
    ];

    pub fn code(self) -> u8 {
        match self {
            PronounGender::NotAPerson => 0,
            PronounGender::Female => 1,
            PronounGender::Male => 2,
            PronounGender::UnknownSingular => 7,
            PronounGender::UnknownPlural => 11,
        }
    }
}

/// Candidate value of a pronoun axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PronounValue {
    Any,
    Gender(PronounGender),
}

/// A value bound to an axis inside one combination
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AxisValue {
    Number(NumberValue),
    Gender(GenderValue),
    Pronoun(PronounValue),
    Enum(String),
}

impl AxisValue {
    pub fn kind(&self) -> VariationKind {
        match self {
            AxisValue::Number(_) => VariationKind::Number,
            AxisValue::Gender(_) => VariationKind::Gender,
            AxisValue::Pronoun(_) => VariationKind::Pronoun,
            AxisValue::Enum(_) => VariationKind::Enum,
        }
    }

    /// Branch key this value occupies in a variation table
    pub fn table_key(&self) -> String {
        match self {
            AxisValue::Number(NumberValue::Any)
            | AxisValue::Gender(GenderValue::Any)
            | AxisValue::Pronoun(PronounValue::Any) => WILDCARD.to_string(),
            AxisValue::Number(NumberValue::ExactlyOne) => EXACTLY_ONE.to_string(),
            AxisValue::Number(NumberValue::Category(category)) => category.code().to_string(),
            AxisValue::Gender(GenderValue::Gender(gender)) => gender.code().to_string(),
            AxisValue::Pronoun(PronounValue::Gender(gender)) => gender.code().to_string(),
            AxisValue::Enum(key) => key.clone(),
        }
    }
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.table_key())
    }
}

/// One dimension of runtime variation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationAxis {
    kind: VariationKind,
    token: Option<String>,
    candidates: Vec<AxisValue>,
    source_identity: String,
    /// Number axes only: the count is rendered with a singular form
    singular: bool,
}

impl VariationAxis {
    /// Create an axis after checking that its candidates are consistent
    pub fn new(
        kind: VariationKind,
        token: Option<String>,
        source_identity: impl Into<String>,
        candidates: Vec<AxisValue>,
    ) -> FbtResult<Self> {
        let source_identity = source_identity.into();
        if candidates.is_empty() {
            return Err(FbtError::InvalidAxis(format!(
                "{} axis `{}` has no candidate values",
                kind, source_identity
            )));
        }
        for (i, candidate) in candidates.iter().enumerate() {
            if candidate.kind() != kind {
                return Err(FbtError::InvalidAxis(format!(
                    "{} axis `{}` cannot take the {} value `{}`",
                    kind,
                    source_identity,
                    candidate.kind(),
                    candidate
                )));
            }
            if candidates[..i].contains(candidate) {
                return Err(FbtError::InvalidAxis(format!(
                    "{} axis `{}` lists `{}` twice",
                    kind, source_identity, candidate
                )));
            }
            if let AxisValue::Number(NumberValue::Category(
                NumberVariation::One | NumberVariation::Other,
            )) = candidate
            {
                return Err(FbtError::InvalidAxis(format!(
                    "number axis `{}` must use `{}` and `{}` for one and other",
                    source_identity, EXACTLY_ONE, WILDCARD
                )));
            }
        }
        match (kind, &token) {
            (VariationKind::Gender, None) => {
                return Err(FbtError::InvalidAxis(format!(
                    "gender axis `{}` requires a token",
                    source_identity
                )));
            }
            (VariationKind::Enum | VariationKind::Pronoun, Some(token)) => {
                return Err(FbtError::InvalidAxis(format!(
                    "{} axis `{}` cannot carry the token `{}`",
                    kind, source_identity, token
                )));
            }
            (_, Some(token)) if token.is_empty() => {
                return Err(FbtError::InvalidAxis(format!(
                    "{} axis `{}` has an empty token",
                    kind, source_identity
                )));
            }
            _ => {}
        }

        Ok(VariationAxis {
            kind,
            token,
            candidates,
            source_identity,
            singular: false,
        })
    }

    /// Plural axis: `*`, then any extended categories, then `_1`
    pub fn plural(
        token: Option<&str>,
        source_identity: impl Into<String>,
        extra: &[NumberVariation],
    ) -> FbtResult<Self> {
        let mut candidates = vec![AxisValue::Number(NumberValue::Any)];
        candidates.extend(
            extra
                .iter()
                .map(|category| AxisValue::Number(NumberValue::Category(*category))),
        );
        candidates.push(AxisValue::Number(NumberValue::ExactlyOne));
        let mut axis = Self::new(
            VariationKind::Number,
            token.map(str::to_string),
            source_identity,
            candidates,
        )?;
        axis.singular = token.is_some();
        Ok(axis)
    }

    /// Number-valued parameter: `*` and `_1`, rendered without a singular flag
    pub fn number(token: &str, source_identity: impl Into<String>) -> FbtResult<Self> {
        Self::new(
            VariationKind::Number,
            Some(token.to_string()),
            source_identity,
            vec![
                AxisValue::Number(NumberValue::Any),
                AxisValue::Number(NumberValue::ExactlyOne),
            ],
        )
    }

    /// Gender axis rendering into `token`.
    ///
    /// `GenderValue::Any` keys the `*` branch, each `GenderValue::Gender`
    /// keys its own code (`1`, `2`, `3`).
    pub fn gender(
        token: &str,
        source_identity: impl Into<String>,
        candidates: &[GenderValue],
    ) -> FbtResult<Self> {
        Self::new(
            VariationKind::Gender,
            Some(token.to_string()),
            source_identity,
            candidates.iter().copied().map(AxisValue::Gender).collect(),
        )
    }

    /// Pronoun axis. Pronouns render no placeholder, so the axis has no
    /// token and its level carries no metadata mask.
    pub fn pronoun(
        source_identity: impl Into<String>,
        candidates: &[PronounValue],
    ) -> FbtResult<Self> {
        Self::new(
            VariationKind::Pronoun,
            None,
            source_identity,
            candidates.iter().copied().map(AxisValue::Pronoun).collect(),
        )
    }

    /// Enum axis with one branch per key, in the given order.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let axis = VariationAxis::enumeration("trip.type", &["car", "train"])?;
    /// assert_eq!(axis.candidates().len(), 2);
    /// ```
    pub fn enumeration<S: AsRef<str>>(
        source_identity: impl Into<String>,
        keys: &[S],
    ) -> FbtResult<Self> {
        Self::new(
            VariationKind::Enum,
            None,
            source_identity,
            keys.iter()
                .map(|key| AxisValue::Enum(key.as_ref().to_string()))
                .collect(),
        )
    }

    pub fn kind(&self) -> VariationKind {
        self.kind
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn candidates(&self) -> &[AxisValue] {
        &self.candidates
    }

    pub fn source_identity(&self) -> &str {
        &self.source_identity
    }

    pub fn accepts(&self, value: &AxisValue) -> bool {
        self.candidates.contains(value)
    }

    /// Descriptor of the table level produced by this axis
    pub fn metadata(&self) -> AxisMetadata {
        match self.kind {
            VariationKind::Number => AxisMetadata::Number {
                token: self.token.clone(),
                singular: self.singular,
            },
            VariationKind::Gender => AxisMetadata::Gender {
                token: self.token.clone().unwrap_or_default(),
            },
            VariationKind::Pronoun => AxisMetadata::Pronoun,
            VariationKind::Enum => AxisMetadata::Enum {
                range: self.candidates.iter().map(AxisValue::table_key).collect(),
            },
        }
    }
}
