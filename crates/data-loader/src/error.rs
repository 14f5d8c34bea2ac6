//! Error types for the data-loader crate.
//!
//! Everything that can go wrong while reading a snapshot directory is
//! reported through [`DataLoadError`]. Recoverable row-level problems
//! (a review without a rating, a stall on the non-food list, a repeated
//! stall row) are not errors: they are counted in the `LoadReport` and
//! skipped.

use thiserror::Error;

/// Errors that can occur during snapshot loading and parsing
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Neither a CSV nor a JSON variant of a snapshot file exists
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Record in a data file couldn't be parsed
    ///
    /// `line` is 1-based for CSV files and the record index for JSON files.
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// No stall survived catalog preparation
    #[error("Stall catalog is empty after preparation ({read} read, {excluded} excluded)")]
    EmptyCatalog { read: usize, excluded: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
