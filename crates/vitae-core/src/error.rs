use thiserror::Error;

/// Persistence errors. The extraction, pipeline, and render modules carry
/// their own error enums; callers map those to their boundary directly.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, Error>;
