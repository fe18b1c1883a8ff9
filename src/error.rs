//! Error types for the string index

use thiserror::Error;

/// Result type alias for neardex operations
pub type Result<T> = std::result::Result<T, NeardexError>;

/// Error types that can occur while building or querying the index
#[derive(Error, Debug)]
pub enum NeardexError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("deadline exceeded")]
    Timeout,

    #[error("operation canceled")]
    Canceled,

    #[error("unknown metric {0:?}")]
    UnknownMetric(String),

    #[error("unknown string normalization {0:?}")]
    UnknownNormalization(String),

    #[error("unknown input format {0:?}")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}
