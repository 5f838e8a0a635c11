// src/error.rs

use crate::model::Hash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    /// Caller asked for an index outside `0..size`
    #[error("index {index} is out of range, valid size is {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// Internal data does not satisfy a structural invariant
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("commit {0} appears more than once")]
    DuplicateCommit(Hash),

    /// A commit must be listed before every one of its parents
    #[error("commit {child} is listed after its parent {parent}")]
    MalformedOrder { child: Hash, parent: Hash },

    /// Merging needs commits that neither the saved log nor the new block contain
    #[error("ref {name} points to {hash}, which is in neither the saved log nor the new block")]
    NotEnoughData { name: String, hash: Hash },

    #[error("cannot render with lane width {lane_width} and row height {row_height}, both must be positive")]
    InvalidRenderSize { lane_width: u32, row_height: u32 },

    #[error("invalid commit hash {0:?}")]
    InvalidHash(String),

    #[error(transparent)]
    Git(#[from] git2::Error),
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;

pub(crate) fn check_index(index: usize, size: usize) -> Result<()> {
    if index < size {
        Ok(())
    } else {
        Err(GraphError::IndexOutOfRange { index, size })
    }
}
