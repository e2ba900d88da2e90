//! Error types for formstate-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Not a recurring group: {0}")]
    NotRecurring(String),

    #[error("Not a group: {0}")]
    NotAGroup(String),

    #[error("Index {index} out of bounds for {path} (len {len})")]
    IndexOutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("Shape conflict at {path}: expected {expected}, got {got}")]
    ShapeConflict {
        path: String,
        expected: String,
        got: String,
    },

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Evaluation error: {0}")]
    EvaluationError(String),
}

impl Error {
    pub(crate) fn shape_conflict(path: impl Into<String>, expected: &str, got: &str) -> Self {
        Error::ShapeConflict {
            path: path.into(),
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }

    pub(crate) fn type_error(expected: &str, got: &str) -> Self {
        Error::TypeError {
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

// Fails to compile if Error stops being Send + Sync.
fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}
