// src/layout.rs

//! Greedy lane assignment over a permanent graph.
//!
//! Every node has at most one successor: the newest child whose first parent
//! it is. Nodes are visited from the oldest end of the permanent order; a
//! node that is its first parent's successor continues that parent's lane,
//! any other node takes the lowest free lane. A lane is freed once its
//! newest node has no successor and all of that node's children have been
//! placed, so branch lines that never overlap share a lane.
//!
//! A node's lane depends only on older nodes, their successors and their
//! child counts. Commits added at the head therefore leave every node older
//! than the oldest commit that gained a child on its lane.

use crate::error::{check_index, Result};
use crate::linear_graph::PermanentLinearGraph;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphLayout {
    lanes: Vec<usize>,
    lane_count: usize,
    heads: Vec<usize>,
}

impl GraphLayout {
    pub fn build(graph: &PermanentLinearGraph) -> Result<Self> {
        let node_count = graph.node_count();

        // Children are visited newest last, so the newest one wins.
        let mut successors: Vec<Option<usize>> = vec![None; node_count];
        for node in (0..node_count).rev() {
            if let Some(parent) = graph.first_parent(node)? {
                successors[parent] = Some(node);
            }
        }

        let mut pending = Vec::with_capacity(node_count);
        for node in 0..node_count {
            pending.push(graph.up_nodes(node)?.len());
        }

        let mut lanes = vec![0usize; node_count];
        let mut free = BTreeSet::new();
        let mut lane_count = 0;

        for node in (0..node_count).rev() {
            let lane = match graph.first_parent(node)? {
                Some(parent) if successors[parent] == Some(node) => lanes[parent],
                _ => free.pop_first().unwrap_or_else(|| {
                    lane_count += 1;
                    lane_count - 1
                }),
            };
            lanes[node] = lane;

            for parent in graph.down_nodes(node)? {
                pending[parent] -= 1;
                if pending[parent] == 0 && successors[parent].is_none() {
                    free.insert(lanes[parent]);
                }
            }
            if pending[node] == 0 {
                free.insert(lane);
            }
        }

        debug!(nodes = node_count, lanes = lane_count, "laid out graph");

        Ok(Self { lanes, lane_count, heads: graph.heads() })
    }

    pub fn lane(&self, node: usize) -> Result<usize> {
        check_index(node, self.lanes.len())?;
        Ok(self.lanes[node])
    }

    /// Lane of every node, indexed by node.
    pub fn lanes(&self) -> &[usize] {
        &self.lanes
    }

    /// Number of lanes in use, which is also the widest the graph gets.
    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Nodes without children, ascending.
    pub fn heads(&self) -> &[usize] {
        &self.heads
    }
}
