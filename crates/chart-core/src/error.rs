// File: crates/chart-core/src/error.rs
// Summary: Crate-wide error type and Result alias.

use thiserror::Error;

/// Errors reported by chart model operations.
///
/// Missing data values are never an error: datasets store them as `None`
/// and renderers skip them.
#[derive(Debug, Error)]
pub enum ChartError {
    /// A constructor or setter received an argument it cannot accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A key that must be unique within its scope was added twice.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// A lookup by key found nothing.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// A lookup by position was past the end.
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A change listener failed; the remaining listeners were not notified.
    #[error("change listener failed: {0}")]
    Listener(String),

    /// A shared value was edited while it was already being edited.
    #[error("shared value is already being edited")]
    Busy,

    #[error("persistence failed: {0}")]
    Persist(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;

impl ChartError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ChartError::InvalidArgument(msg.into())
    }
}

/// Fail with `IndexOutOfBounds` unless `index < len`.
#[inline]
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(ChartError::IndexOutOfBounds { index, len })
    }
}
