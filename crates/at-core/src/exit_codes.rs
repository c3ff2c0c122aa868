//! Exit codes for the at-core CLI.
//!
//! Exit codes communicate operation outcome without requiring output
//! parsing; they are a stable contract for automation.
//!
//! Ranges:
//! - 0: success
//! - 10-19: user/environment errors (recoverable by user action)
//! - 20-29: internal errors

use at_common::ErrorCategory;

/// Exit codes for at-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Clean run.
    Ok = 0,

    /// Invalid arguments or configuration.
    ConfigError = 10,

    /// Missing or mismatched artifact (Q-table, dataset, log store).
    ArtifactError = 11,

    /// Malformed input data.
    DataError = 12,

    /// Internal error.
    InternalError = 20,
}

impl ExitCode {
    /// Map an error to its exit code by category.
    pub fn from_error(err: &at_common::Error) -> ExitCode {
        match err.category() {
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Table | ErrorCategory::Io => ExitCode::ArtifactError,
            ErrorCategory::Data => ExitCode::DataError,
            ErrorCategory::State => ExitCode::InternalError,
        }
    }

    /// The process exit status.
    pub fn code(self) -> i32 {
        self as i32
    }
}
