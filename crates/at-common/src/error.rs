//! Error types for Authentication Triage.
//!
//! Structured error handling with stable numeric codes for machine parsing
//! and category classification for grouping. Codes are grouped in decades:
//! - 10-19: configuration errors
//! - 20-29: state-space errors
//! - 30-39: Q-table errors
//! - 40-49: dataset and log-store errors
//! - 60-69: I/O and serialization errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Authentication Triage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Hyperparameter / shaping / transition-matrix configuration errors.
    Config,
    /// State-space indexing errors.
    State,
    /// Q-table artifact errors.
    Table,
    /// Validation dataset and decision-log errors.
    Data,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::State => write!(f, "state"),
            ErrorCategory::Table => write!(f, "table"),
            ErrorCategory::Data => write!(f, "data"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for Authentication Triage.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid value for {field}: {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("transition matrix for {action} row {row} sums to {sum}, expected 1.0")]
    MatrixNotStochastic { action: String, row: usize, sum: f64 },

    // State-space errors (20-29)
    #[error("state {state:?} is outside the declared domain")]
    OutOfDomain { state: Vec<u8> },

    #[error("state index {index} out of range for {states} states")]
    IndexOutOfRange { index: usize, states: usize },

    #[error("state arity mismatch: expected {expected} dimensions, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    // Q-table errors (30-39)
    #[error("Q-table has {actual} rows, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Q-table artifact corrupted: {0}")]
    TableCorrupted(String),

    // Dataset / log-store errors (40-49)
    #[error("dataset error at {path}:{line}: {message}")]
    Dataset {
        path: String,
        line: usize,
        message: String,
    },

    #[error("missing required column {column} in {path}")]
    MissingColumn { column: String, path: String },

    #[error("log store error: {0}")]
    LogStore(String),

    // I/O errors (60-69)
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error on {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Stable error code, grouped by category.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfigValue { .. } => 11,
            Error::MatrixNotStochastic { .. } => 12,
            Error::OutOfDomain { .. } => 20,
            Error::IndexOutOfRange { .. } => 21,
            Error::ArityMismatch { .. } => 22,
            Error::DimensionMismatch { .. } => 30,
            Error::TableCorrupted(_) => 31,
            Error::Dataset { .. } => 40,
            Error::MissingColumn { .. } => 41,
            Error::LogStore(_) => 42,
            Error::Io { .. } => 60,
            Error::Json { .. } => 61,
        }
    }

    /// Category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_)
            | Error::InvalidConfigValue { .. }
            | Error::MatrixNotStochastic { .. } => ErrorCategory::Config,

            Error::OutOfDomain { .. }
            | Error::IndexOutOfRange { .. }
            | Error::ArityMismatch { .. } => ErrorCategory::State,

            Error::DimensionMismatch { .. } | Error::TableCorrupted(_) => ErrorCategory::Table,

            Error::Dataset { .. } | Error::MissingColumn { .. } | Error::LogStore(_) => {
                ErrorCategory::Data
            }

            Error::Io { .. } | Error::Json { .. } => ErrorCategory::Io,
        }
    }

    /// Convenience constructor for I/O errors tagged with their path.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Convenience constructor for JSON errors tagged with their path.
    pub fn json(path: impl AsRef<std::path::Path>, source: serde_json::Error) -> Self {
        Error::Json {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
