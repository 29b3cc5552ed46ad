//! Errors raised while reading app pack files.

use std::path::PathBuf;

use thiserror::Error;

/// Load-time failure. Any of these stops the pipeline before generation.
#[derive(Debug, Error)]
pub enum PackError {
    /// The pack file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The pack file is not valid JSON or does not match the pack schema.
    #[error("malformed app pack {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The pack file is not valid TOML or does not match the pack schema.
    #[error("malformed app pack {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A required key is missing or empty.
    #[error("app pack is missing required field '{0}'")]
    MissingField(&'static str),

    /// `entities` is absent or empty.
    #[error("app pack must declare at least one entity")]
    NoEntities,
}

/// Failure while rendering generated files. Generators are pure text
/// builders, so this only surfaces serialisation faults.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("cannot serialise seed plan: {0}")]
    SeedPlan(#[from] serde_json::Error),
}
