use thiserror::Error;

/// Errors raised while building variation tables or resolving translations.
///
/// Authoring errors (`DuplicateLeaf`, `IncompatibleEnumReuse`, `DuplicateToken`,
/// `InvalidAxis`, `TooManyCombinations`) abort the construction of the whole
/// phrase. Translation-side errors (`MissingTranslation`, `MalformedRecord`,
/// `DuplicateConstraint`) abort the resolution of one locale only.
#[derive(Error, Debug)]
pub enum FbtError {
    /// A second leaf was inserted at an already occupied key path
    #[error("Overwriting an existing tree leaf is not allowed. keys=`{path:?}`")]
    DuplicateLeaf { path: Vec<String> },
    /// A de-duplicated enum was reused with a key outside its declared range
    #[error(
        "`{key}` not found in {range:?}. Attempting to re-use incompatible enums (source `{identity}`)"
    )]
    IncompatibleEnumReuse {
        identity: String,
        key: String,
        range: Vec<String>,
    },
    /// Two independent axes claim the same placeholder token
    #[error("There's already a token called `{token}` in this phrase")]
    DuplicateToken { token: String },
    /// Axis construction error (empty candidates, wrong candidate kind, ...)
    #[error("Invalid variation axis: {0}")]
    InvalidAxis(String),
    /// Enumeration would exceed the configured bound
    #[error("Too many combinations ({count} > {limit})")]
    TooManyCombinations { count: usize, limit: usize },
    /// Strict mode: a leaf has no translation record for the locale
    #[error("Missing {locale} translation for string ({hash})")]
    MissingTranslation { locale: String, hash: String },
    /// A translation record that cannot be interpreted
    #[error("Malformed translation record for {hash}: {reason}")]
    MalformedRecord { hash: String, reason: String },
    /// Two translations of one record map to the same constraint key
    #[error("Unexpected duplicate key: {key}\nOriginal: {original}\nNew {new}")]
    DuplicateConstraint {
        key: String,
        original: String,
        new: String,
    },
    /// Metadata inconsistent with the tree level it describes
    #[error("Invalid axis metadata: {0}")]
    InvalidMetadata(String),
    /// Locale string that cannot be interpreted
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
    /// Phrase site inconsistent with its variation table
    #[error("Invalid phrase: {0}")]
    InvalidPhrase(String),
    /// Error serializing or deserializing a jsfbt payload
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for jsfbt operations
pub type FbtResult<T> = Result<T, FbtError>;
