//! Output Formatting
//!
//! Table output for humans, JSON for scripts.

pub mod json;
pub mod table;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact JSON (one line)
    JsonCompact,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}
