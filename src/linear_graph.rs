// src/linear_graph.rs

//! Immutable adjacency over node indices `0..n`. Node `i` is the `i`-th
//! commit of the log it was built from; children come before parents.

use crate::commits_info::PermanentCommitsInfo;
use crate::error::{check_index, GraphError, Result};
use crate::model::{Hash, TimeCommitParents};
use tracing::debug;

/// Lower end of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeTarget {
    Node(usize),
    /// Parent outside the loaded history (shallow clone, unfetched range)
    NotLoaded(Hash),
}

/// Edge from a commit (`up`) to one of its parents (`down`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge {
    pub up: usize,
    pub down: EdgeTarget,
}

#[derive(Debug, Clone, Default)]
pub struct PermanentLinearGraph {
    parent_offsets: Vec<usize>,
    parents: Vec<EdgeTarget>,
    child_offsets: Vec<usize>,
    children: Vec<usize>,
}

impl PermanentLinearGraph {
    pub fn build(commits: &[TimeCommitParents]) -> Result<(Self, PermanentCommitsInfo)> {
        let info = PermanentCommitsInfo::new(commits)?;

        let mut parent_offsets = Vec::with_capacity(commits.len() + 1);
        let mut parents = Vec::with_capacity(commits.len());
        let mut child_counts = vec![0usize; commits.len()];
        let mut not_loaded = 0;

        parent_offsets.push(0);
        for (node, commit) in commits.iter().enumerate() {
            for parent in &commit.parents {
                match info.node_id(&(*parent).into()) {
                    Some(parent_node) if parent_node <= node => {
                        return Err(GraphError::MalformedOrder { child: commit.hash, parent: *parent });
                    }
                    Some(parent_node) => {
                        child_counts[parent_node] += 1;
                        parents.push(EdgeTarget::Node(parent_node));
                    }
                    None => {
                        not_loaded += 1;
                        parents.push(EdgeTarget::NotLoaded(*parent));
                    }
                }
            }
            parent_offsets.push(parents.len());
        }

        // Second pass: children lists, filled in ascending child order.
        let mut child_offsets = Vec::with_capacity(commits.len() + 1);
        child_offsets.push(0);
        for count in &child_counts {
            child_offsets.push(child_offsets[child_offsets.len() - 1] + count);
        }
        let mut fill = child_offsets[..commits.len()].to_vec();
        let mut children = vec![0usize; child_offsets[commits.len()]];
        for node in 0..commits.len() {
            for target in &parents[parent_offsets[node]..parent_offsets[node + 1]] {
                if let EdgeTarget::Node(parent) = *target {
                    children[fill[parent]] = node;
                    fill[parent] += 1;
                }
            }
        }

        debug!(nodes = commits.len(), edges = parents.len(), not_loaded, "built permanent linear graph");

        let graph = Self { parent_offsets, parents, child_offsets, children };
        Ok((graph, info))
    }

    pub fn node_count(&self) -> usize {
        self.parent_offsets.len().saturating_sub(1)
    }

    /// Parent edge targets in parent order, including not-loaded ones.
    pub fn parent_targets(&self, node: usize) -> Result<&[EdgeTarget]> {
        check_index(node, self.node_count())?;
        Ok(&self.parents[self.parent_offsets[node]..self.parent_offsets[node + 1]])
    }

    /// Loaded parents of `node`, in parent order.
    pub fn down_nodes(&self, node: usize) -> Result<Vec<usize>> {
        Ok(self
            .parent_targets(node)?
            .iter()
            .filter_map(|target| match *target {
                EdgeTarget::Node(parent) => Some(parent),
                EdgeTarget::NotLoaded(_) => None,
            })
            .collect())
    }

    /// Children of `node`, in ascending node order.
    pub fn up_nodes(&self, node: usize) -> Result<&[usize]> {
        check_index(node, self.node_count())?;
        Ok(&self.children[self.child_offsets[node]..self.child_offsets[node + 1]])
    }

    /// The main-line parent, if it is loaded.
    pub fn first_parent(&self, node: usize) -> Result<Option<usize>> {
        Ok(match self.parent_targets(node)?.first() {
            Some(EdgeTarget::Node(parent)) => Some(*parent),
            _ => None,
        })
    }

    pub fn not_loaded_parents(&self, node: usize) -> Result<Vec<Hash>> {
        Ok(self
            .parent_targets(node)?
            .iter()
            .filter_map(|target| match *target {
                EdgeTarget::NotLoaded(hash) => Some(hash),
                EdgeTarget::Node(_) => None,
            })
            .collect())
    }

    pub fn edges(&self, node: usize) -> Result<Vec<GraphEdge>> {
        Ok(self
            .parent_targets(node)?
            .iter()
            .map(|&down| GraphEdge { up: node, down })
            .collect())
    }

    pub fn heads(&self) -> Vec<usize> {
        (0..self.node_count())
            .filter(|&node| self.child_offsets[node] == self.child_offsets[node + 1])
            .collect()
    }
}
