// src/engine.rs

//! Owner of the current graph snapshot. Refreshes build a whole new
//! `PermanentGraphInfo` and publish it with one pointer swap; readers keep
//! whatever snapshot they already hold.

use crate::error::Result;
use crate::graph_info::PermanentGraphInfo;
use crate::joiner::{self, RefsDiff};
use crate::model::{Ref, TimeCommitParents};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

type Published = Arc<RwLock<Arc<PermanentGraphInfo>>>;

/// Takes `&mut self` for every rebuild, so two rebuilds of the same engine
/// can never overlap.
#[derive(Debug)]
pub struct GraphEngine {
    log: Vec<TimeCommitParents>,
    refs: Vec<Ref>,
    published: Published,
}

/// Cheap handle for reading the latest snapshot from any thread
#[derive(Debug, Clone)]
pub struct GraphReader {
    published: Published,
}

impl GraphReader {
    pub fn snapshot(&self) -> Arc<PermanentGraphInfo> {
        Arc::clone(&self.published.read())
    }
}

/// What a refresh changed
#[derive(Debug, Clone)]
pub struct Refresh {
    pub new_commits: usize,
    pub top_size: usize,
    pub refs: RefsDiff,
}

impl GraphEngine {
    pub fn new(log: Vec<TimeCommitParents>, refs: Vec<Ref>) -> Result<Self> {
        let info = PermanentGraphInfo::build(&log, &refs)?;
        Ok(Self { log, refs, published: Arc::new(RwLock::new(Arc::new(info))) })
    }

    pub fn reader(&self) -> GraphReader {
        GraphReader { published: Arc::clone(&self.published) }
    }

    pub fn snapshot(&self) -> Arc<PermanentGraphInfo> {
        Arc::clone(&self.published.read())
    }

    pub fn log(&self) -> &[TimeCommitParents] {
        &self.log
    }

    pub fn refs(&self) -> &[Ref] {
        &self.refs
    }

    /// Joins `new_block` into the current log and publishes the result.
    /// On error nothing is published and the engine is left unchanged.
    pub fn refresh(&mut self, new_block: &[TimeCommitParents], new_refs: Vec<Ref>) -> Result<Refresh> {
        let joined = joiner::add_commits(&self.log, &self.refs, new_block, &new_refs)?;
        let new_commits = joined.commits.len() - self.log.len();
        let info = PermanentGraphInfo::build(&joined.commits, &new_refs)?;

        self.log = joined.commits;
        self.refs = new_refs;
        self.publish(info);
        info!(new_commits, top_size = joined.top_size, "published refreshed graph");

        Ok(Refresh { new_commits, top_size: joined.top_size, refs: joined.refs })
    }

    /// Replaces the log and refs wholesale.
    pub fn rebuild(&mut self, log: Vec<TimeCommitParents>, refs: Vec<Ref>) -> Result<()> {
        let info = PermanentGraphInfo::build(&log, &refs)?;
        self.log = log;
        self.refs = refs;
        self.publish(info);
        Ok(())
    }

    fn publish(&self, info: PermanentGraphInfo) {
        *self.published.write() = Arc::new(info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{branch, commit, h};
    use std::thread;

    fn saved_log() -> Vec<TimeCommitParents> {
        vec![
            commit(4, "a2", &["a1"]),
            commit(3, "b1", &["a"]),
            commit(2, "a1", &["a"]),
            commit(1, "a", &[]),
        ]
    }

    #[test]
    fn refresh_swaps_snapshot_and_keeps_old_readers_valid() {
        let mut engine = GraphEngine::new(saved_log(), vec![branch("master", "a2")]).unwrap();
        let reader = engine.reader();
        let old = reader.snapshot();

        let refresh = engine
            .refresh(&[commit(5, "e", &["a2"])], vec![branch("master", "e")])
            .unwrap();
        assert_eq!(refresh.new_commits, 1);

        assert_eq!(old.permanent_linear_graph().node_count(), 4);
        let new = reader.snapshot();
        assert_eq!(new.permanent_linear_graph().node_count(), 5);
        assert_eq!(new.node_of(&h("e").into()), Some(0));
        assert_eq!(new.branch_node_ids(), &[0]);
    }

    #[test]
    fn failed_refresh_publishes_nothing() {
        let mut engine = GraphEngine::new(saved_log(), vec![]).unwrap();
        let before = engine.snapshot();
        assert!(engine.refresh(&[], vec![branch("master", "dd")]).is_err());
        assert!(Arc::ptr_eq(&before, &engine.snapshot()));
        assert_eq!(engine.log().len(), 4);
    }

    #[test]
    fn readers_on_other_threads() {
        let engine = GraphEngine::new(saved_log(), vec![]).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let reader = engine.reader();
                thread::spawn(move || reader.snapshot().permanent_graph_layout().lane_count())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
    }
}
