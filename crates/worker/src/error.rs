use ppscc_core::error::CoreError;
use ppscc_db::error::DbError;

/// Errors that stop the recalculation worker.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// An environment variable held a value that could not be used.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
