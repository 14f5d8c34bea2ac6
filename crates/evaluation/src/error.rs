//! Error types for evaluation runs.

use thiserror::Error;

/// Errors that can abort an evaluation run
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// The scorer knows none of the catalog stalls, or the catalog is empty
    #[error("No scorable items: catalog has {catalog} stalls, scorer '{model}' knows none of them")]
    NoScorableItems { model: String, catalog: usize },

    #[error("Ranker got {candidates} candidates but {scores} scores")]
    LengthMismatch { candidates: usize, scores: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Interaction filtering failed: {0}")]
    Pipeline(#[from] anyhow::Error),

    #[error(transparent)]
    Data(#[from] data_loader::DataLoadError),

    #[error(transparent)]
    Score(#[from] scorers::ScoreError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EvaluationError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        EvaluationError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, EvaluationError>;
