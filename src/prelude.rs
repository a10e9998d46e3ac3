use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for the evaluation pipeline. Per-document variants
/// (`NotFound`, `Extraction`) never escape the worker's document loop;
/// provider variants are absorbed into degraded results before they reach
/// the worker; only `StoreUnavailable` is allowed to fail a whole job.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("extraction failed: {0}")]
    Extraction(String),

    #[error("provider configuration: {0}")]
    ProviderConfig(String),

    #[error("provider transport: {0}")]
    ProviderTransport(String),

    #[error("provider response format: {0}")]
    ProviderFormat(String),

    #[error("result store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    #[error("queue: {0}")]
    Queue(String),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sqlx::migrate::MigrateError> for Error {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        Error::StoreUnavailable(e.into())
    }
}
