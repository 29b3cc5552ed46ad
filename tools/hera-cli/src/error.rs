//! CLI Error Types
//!
//! Every failure ends the process with exit code 1; the message is printed
//! once by `main`.

use std::path::PathBuf;

use hera_codegen::{GenerateError, PackError};
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// The pack or overlay could not be loaded
    #[error("{0}")]
    Pack(#[from] PackError),

    /// The pack loaded but has `Error`-severity issues
    #[error("Validation failed: {errors} error(s) in {}\n  Hint: fix the errors above and retry", path.display())]
    ValidationFailed { path: PathBuf, errors: usize },

    /// A generator failed; this is a bug, not bad input
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerateError),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn validation_failed(path: impl Into<PathBuf>, errors: usize) -> Self {
        Self::ValidationFailed {
            path: path.into(),
            errors,
        }
    }
}
