use std::path::PathBuf;

use ppscc_core::error::CoreError;

/// Errors raised by the in-memory store and the fixture loader.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A domain-level error from `ppscc_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid field `{field}` in {record}: {value}")]
    InvalidField {
        record: String,
        field: &'static str,
        value: String,
    },
}
