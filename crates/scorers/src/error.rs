//! Errors raised by fitted scorers.

use thiserror::Error;

/// Errors that can occur when loading or querying a fitted model
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// Vectors in an artifact disagree on their length
    #[error("Dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    /// The model name is used as a result file name
    #[error("Invalid model name '{0}': must be non-empty without path separators or '..'")]
    InvalidName(String),

    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model artifact: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScoreError>;
