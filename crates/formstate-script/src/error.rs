//! Error types for formstate-script

use thiserror::Error;

/// Form definition loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error(transparent)]
    Core(#[from] formstate_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
