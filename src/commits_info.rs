// src/commits_info.rs

use crate::error::{check_index, GraphError, Result};
use crate::model::{CommitId, TimeCommitParents};
use std::collections::HashMap;

/// Node index <-> commit id correspondence of a permanent graph
#[derive(Debug, Clone)]
pub struct PermanentCommitsInfo {
    ids: Vec<CommitId>,
    timestamps: Vec<i64>,
    nodes: HashMap<CommitId, usize>,
}

impl PermanentCommitsInfo {
    pub fn new(commits: &[TimeCommitParents]) -> Result<Self> {
        let mut nodes = HashMap::with_capacity(commits.len());
        for (node, commit) in commits.iter().enumerate() {
            if nodes.insert(commit.id(), node).is_some() {
                return Err(GraphError::DuplicateCommit(commit.hash));
            }
        }
        Ok(Self {
            ids: commits.iter().map(TimeCommitParents::id).collect(),
            timestamps: commits.iter().map(|c| c.timestamp).collect(),
            nodes,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn commit_id(&self, node: usize) -> Result<CommitId> {
        check_index(node, self.ids.len())?;
        Ok(self.ids[node])
    }

    pub fn timestamp(&self, node: usize) -> Result<i64> {
        check_index(node, self.timestamps.len())?;
        Ok(self.timestamps[node])
    }

    pub fn node_id(&self, id: &CommitId) -> Option<usize> {
        self.nodes.get(id).copied()
    }

    /// Commit ids in node order.
    pub fn commit_ids(&self) -> &[CommitId] {
        &self.ids
    }
}
