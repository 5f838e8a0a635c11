// src/graph_info.rs

use crate::colors::GraphColorManager;
use crate::commits_info::PermanentCommitsInfo;
use crate::error::{check_index, Result};
use crate::int_map::{IntToIntMap, SortedIntToIntMap};
use crate::layout::GraphLayout;
use crate::linear_graph::PermanentLinearGraph;
use crate::model::{CommitId, Ref, TimeCommitParents};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info};

/// Everything derived from one log and ref set. Immutable once built.
#[derive(Debug)]
pub struct PermanentGraphInfo {
    commits_info: PermanentCommitsInfo,
    linear_graph: PermanentLinearGraph,
    layout: GraphLayout,
    branch_node_ids: Vec<usize>,
    color_manager: GraphColorManager,
    row_map: SortedIntToIntMap,
    refs: Vec<Ref>,
}

impl PermanentGraphInfo {
    pub fn build(log: &[TimeCommitParents], refs: &[Ref]) -> Result<Self> {
        let start = Instant::now();
        let (linear_graph, commits_info) = PermanentLinearGraph::build(log)?;
        let layout = GraphLayout::build(&linear_graph)?;
        let color_manager = GraphColorManager::new(&layout);

        let mut branch_nodes = BTreeSet::new();
        for r in refs.iter().filter(|r| r.ref_type.is_branch()) {
            match commits_info.node_id(&r.hash.into()) {
                Some(node) => {
                    branch_nodes.insert(node);
                }
                None => debug!(name = %r.name, "branch points outside the loaded graph"),
            }
        }

        info!(
            commits = log.len(),
            lanes = layout.lane_count(),
            branches = branch_nodes.len(),
            elapsed = ?start.elapsed(),
            "built permanent graph"
        );

        Ok(Self {
            row_map: SortedIntToIntMap::identity(linear_graph.node_count()),
            commits_info,
            linear_graph,
            layout,
            branch_node_ids: branch_nodes.into_iter().collect(),
            color_manager,
            refs: refs.to_vec(),
        })
    }

    pub fn permanent_commits_info(&self) -> &PermanentCommitsInfo {
        &self.commits_info
    }

    pub fn permanent_linear_graph(&self) -> &PermanentLinearGraph {
        &self.linear_graph
    }

    pub fn permanent_graph_layout(&self) -> &GraphLayout {
        &self.layout
    }

    /// Nodes targeted by branch refs (local, remote, HEAD), ascending.
    pub fn branch_node_ids(&self) -> &[usize] {
        &self.branch_node_ids
    }

    pub fn graph_color_manager(&self) -> &GraphColorManager {
        &self.color_manager
    }

    /// Row to node map of the unfiltered graph.
    pub fn row_map(&self) -> &SortedIntToIntMap {
        &self.row_map
    }

    pub fn refs(&self) -> &[Ref] {
        &self.refs
    }

    pub fn refs_at(&self, node: usize) -> Result<Vec<&Ref>> {
        let id = self.commits_info.commit_id(node)?;
        Ok(self.refs.iter().filter(|r| r.hash == id.hash()).collect())
    }

    pub fn node_of(&self, id: &CommitId) -> Option<usize> {
        self.commits_info.node_id(id)
    }

    /// Rows for the commits reachable from `heads`.
    pub fn visible_graph(&self, heads: &[usize]) -> Result<VisibleGraph> {
        let node_count = self.linear_graph.node_count();
        let mut visible = vec![false; node_count];
        let mut stack = Vec::with_capacity(heads.len());
        for &head in heads {
            check_index(head, node_count)?;
            stack.push(head);
        }
        while let Some(node) = stack.pop() {
            if visible[node] {
                continue;
            }
            visible[node] = true;
            stack.extend(self.linear_graph.down_nodes(node)?.into_iter().filter(|&p| !visible[p]));
        }
        Ok(VisibleGraph { rows: SortedIntToIntMap::from_flags(&visible) })
    }
}

/// A filtered view: rows are the visible nodes in permanent order.
#[derive(Debug, Clone)]
pub struct VisibleGraph {
    rows: SortedIntToIntMap,
}

impl VisibleGraph {
    pub fn row_count(&self) -> usize {
        self.rows.short_size()
    }

    pub fn node_at_row(&self, row: usize) -> Result<usize> {
        self.rows.get_long_index(row)
    }

    /// Row of `node`, `None` when the node is filtered out.
    pub fn row_of_node(&self, node: usize) -> Option<usize> {
        self.rows.short_index_of(node)
    }

    /// Row of `node`, or of the closest visible node above it.
    pub fn nearest_row(&self, node: usize) -> Result<usize> {
        self.rows.get_short_index(node)
    }

    pub fn row_map(&self) -> &SortedIntToIntMap {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RefType;
    use crate::test_utils::{branch, commit, h};

    fn log() -> Vec<TimeCommitParents> {
        vec![
            commit(4, "a2", &["a1"]),
            commit(3, "b1", &["a"]),
            commit(2, "a1", &["a"]),
            commit(1, "a", &[]),
        ]
    }

    #[test]
    fn round_trip_commits() {
        let log = log();
        let info = PermanentGraphInfo::build(&log, &[]).unwrap();
        let ids: Vec<CommitId> = log.iter().map(TimeCommitParents::id).collect();
        assert_eq!(info.permanent_commits_info().commit_ids(), ids.as_slice());
        assert_eq!(info.row_map().short_size(), 4);
    }

    #[test]
    fn branch_nodes_skip_tags_and_unknown_targets() {
        let refs = vec![
            branch("master", "a2"),
            Ref::new(h("b1"), "HEAD", RefType::Head),
            Ref::new(h("a"), "v1", RefType::Tag),
            branch("gone", "ee"),
        ];
        let info = PermanentGraphInfo::build(&log(), &refs).unwrap();
        assert_eq!(info.branch_node_ids(), &[0, 1]);
        assert_eq!(info.refs_at(3).unwrap().len(), 1);
    }

    #[test]
    fn visible_graph_follows_parents() {
        let info = PermanentGraphInfo::build(&log(), &[]).unwrap();
        let view = info.visible_graph(&[1]).unwrap();
        assert_eq!(view.row_count(), 2);
        assert_eq!(view.node_at_row(0).unwrap(), 1);
        assert_eq!(view.node_at_row(1).unwrap(), 3);
        assert_eq!(view.row_of_node(2), None);
        assert_eq!(view.nearest_row(2).unwrap(), 0);
        assert!(info.visible_graph(&[9]).is_err());
    }

    #[test]
    fn snapshot_is_plain_shared_data() {
        fn assert_shareable<T: Send + Sync + std::panic::RefUnwindSafe + std::panic::UnwindSafe>() {}
        assert_shareable::<PermanentGraphInfo>();

        let info = PermanentGraphInfo::build(&log(), &[]).unwrap();
        let caught = std::panic::catch_unwind(|| info.graph_color_manager().color(0).unwrap());
        assert!(caught.is_ok());
    }
}
