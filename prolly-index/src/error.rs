//! Error types for prolly-index operations.

use std::io;
use thiserror::Error;

use crate::hash::Hash;

/// Error type for store and cursor operations.
///
/// Invariant violations (parent chain depth mismatch, comparing cursors over
/// different trees) are programmer errors and panic instead of surfacing
/// here.
#[derive(Debug, Clone, Error)]
pub enum TreeError {
    /// A node store lookup missed. Fatal to the current traversal.
    #[error("node {0} not found")]
    NotFound(Hash),

    /// Transport or storage failure. Not retried at this layer.
    #[error("i/o error: {0}")]
    Io(String),

    /// Node encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The operation's context was cancelled. The cursor position is
    /// undefined; callers must seek to a known key or discard the cursor.
    #[error("operation cancelled")]
    Cancelled,

    /// A positional lookup exceeded the tree's cumulative count.
    #[error("index {index} out of range for tree of {count} items")]
    OutOfRange { index: u64, count: u64 },
}

impl From<io::Error> for TreeError {
    fn from(err: io::Error) -> Self {
        TreeError::Io(err.to_string())
    }
}

impl From<bincode::Error> for TreeError {
    fn from(err: bincode::Error) -> Self {
        TreeError::Serialization(err.to_string())
    }
}
