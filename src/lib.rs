// src/lib.rs

//! Commit graph model and lane layout for drawing a VCS log.
//!
//! A log (children before parents) and a ref set are turned into a
//! [`PermanentGraphInfo`]: the adjacency of the whole history, a lane per
//! commit, a color per lane and row maps for filtered views. [`GraphEngine`]
//! keeps the current snapshot and swaps in a new one when fresh commits are
//! joined in.

pub mod analyzer;
pub mod colors;
pub mod commits_info;
pub mod engine;
pub mod error;
pub mod graph_info;
pub mod int_map;
pub mod joiner;
pub mod layout;
pub mod linear_graph;
pub mod model;
pub mod renderer;

#[cfg(test)]
mod test_utils;

pub use colors::{ColorBucket, GraphColorManager};
pub use commits_info::PermanentCommitsInfo;
pub use engine::{GraphEngine, GraphReader, Refresh};
pub use error::{GraphError, Result};
pub use graph_info::{PermanentGraphInfo, VisibleGraph};
pub use int_map::{IntToIntMap, SortedIntToIntMap};
pub use joiner::{add_commits, JoinResult, RefsDiff};
pub use layout::GraphLayout;
pub use linear_graph::{EdgeTarget, GraphEdge, PermanentLinearGraph};
pub use model::{CommitId, CommitRecord, Hash, Ref, RefType, TimeCommitParents};
