use jsfbt::FbtError;
use thiserror::Error;

/// Error types for the translation pipeline
#[derive(Error, Debug)]
pub enum TranslateError {
    /// A phrase could not be turned into a phrase site
    #[error("Phrase {index}: {source}")]
    Phrase {
        index: usize,
        #[source]
        source: FbtError,
    },
    /// Terse collect output: the phrase carries no variation table
    #[error("Expect every phrase to have 'jsfbt' field. However, 'jsfbt' is missing in the phrase at index {index}.")]
    MissingJsFbt { index: usize },
    /// Resolution of one locale was aborted
    #[error("Locale {locale}: {source}")]
    Locale {
        locale: String,
        #[source]
        source: FbtError,
    },
    /// Error from the core library outside of a phrase or locale context
    #[error(transparent)]
    Fbt(#[from] FbtError),
    /// Malformed JSON artifact
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for pipeline operations
pub type TranslateResult<T> = Result<T, TranslateError>;
