// src/joiner.rs

//! Merges a freshly fetched block of commits into a saved log without
//! walking the whole history again.

use crate::error::{GraphError, Result};
use crate::model::{Hash, Ref, RefType, TimeCommitParents};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinResult {
    pub commits: Vec<TimeCommitParents>,
    /// Length of the re-ordered head part. `commits[top_size..]` is the
    /// unchanged tail of the saved log.
    pub top_size: usize,
    pub refs: RefsDiff,
}

/// How the ref set changed between two refreshes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefsDiff {
    pub added: Vec<Ref>,
    pub removed: Vec<Ref>,
    pub moved: Vec<Ref>,
    /// Moved refs whose new target was already in the saved log, which is
    /// what a force-push or a reset looks like. Reported only.
    pub moved_to_known: Vec<Ref>,
}

impl RefsDiff {
    fn between(old_refs: &[Ref], new_refs: &[Ref], known: &HashMap<Hash, usize>) -> Self {
        let key = |r: &Ref| (r.name.clone(), r.ref_type);
        let old: HashMap<(String, RefType), &Ref> = old_refs.iter().map(|r| (key(r), r)).collect();
        let new: HashMap<(String, RefType), &Ref> = new_refs.iter().map(|r| (key(r), r)).collect();

        let mut diff = RefsDiff::default();
        for r in new_refs {
            match old.get(&key(r)) {
                None => diff.added.push(r.clone()),
                Some(previous) if previous.hash != r.hash => {
                    diff.moved.push(r.clone());
                    if known.contains_key(&r.hash) {
                        diff.moved_to_known.push(r.clone());
                    }
                }
                Some(_) => {}
            }
        }
        diff.removed = old_refs.iter().filter(|r| !new.contains_key(&key(r))).cloned().collect();
        diff
    }
}

/// Merges `new_block` and `new_refs` into `existing_log`.
///
/// Commits of the block that the saved log already has are dropped. The rest
/// are merged with the saved log's head part in date order, every commit
/// staying ahead of its parents; saved commits keep their relative order.
pub fn add_commits(
    existing_log: &[TimeCommitParents],
    existing_refs: &[Ref],
    new_block: &[TimeCommitParents],
    new_refs: &[Ref],
) -> Result<JoinResult> {
    let positions: HashMap<Hash, usize> =
        existing_log.iter().enumerate().map(|(i, c)| (c.hash, i)).collect();

    let mut seen = HashSet::new();
    let fresh: Vec<&TimeCommitParents> = new_block
        .iter()
        .filter(|c| !positions.contains_key(&c.hash) && seen.insert(c.hash))
        .collect();

    for r in new_refs {
        if !positions.contains_key(&r.hash) && !seen.contains(&r.hash) {
            return Err(GraphError::NotEnoughData { name: r.name.clone(), hash: r.hash });
        }
    }

    let refs = RefsDiff::between(existing_refs, new_refs, &positions);
    for r in &refs.moved_to_known {
        warn!(name = %r.name, commit = %r.hash.short(), "ref moved to an already known commit, joining without rewriting history");
    }

    if fresh.is_empty() {
        return Ok(JoinResult { commits: existing_log.to_vec(), top_size: 0, refs });
    }

    // Saved commits touching the new ones, as parents or as children,
    // bound the part of the saved log that has to be re-ordered.
    let mut boundary = 0;
    for commit in &fresh {
        for parent in &commit.parents {
            if let Some(&pos) = positions.get(parent) {
                boundary = boundary.max(pos + 1);
            }
        }
    }
    for (pos, commit) in existing_log.iter().enumerate() {
        if commit.parents.iter().any(|p| seen.contains(p)) {
            boundary = boundary.max(pos + 1);
        }
    }
    // Saved commits at least as new as the oldest new one are re-ordered too.
    let oldest_fresh = fresh.iter().map(|c| c.timestamp).min().unwrap_or(i64::MIN);
    while boundary < existing_log.len() && existing_log[boundary].timestamp >= oldest_fresh {
        boundary += 1;
    }

    let top = merge_top(&existing_log[..boundary], &fresh)?;
    let top_size = top.len();
    debug!(new = fresh.len(), reordered = boundary, top_size, "joined new commits");

    let mut commits = top;
    commits.extend_from_slice(&existing_log[boundary..]);
    Ok(JoinResult { commits, top_size, refs })
}

fn merge_top(
    saved: &[TimeCommitParents],
    fresh: &[&TimeCommitParents],
) -> Result<Vec<TimeCommitParents>> {
    let all: Vec<&TimeCommitParents> = saved.iter().chain(fresh.iter().copied()).collect();
    let index: HashMap<Hash, usize> = all.iter().enumerate().map(|(i, c)| (c.hash, i)).collect();

    // Children not yet emitted, per commit.
    let mut pending = vec![0usize; all.len()];
    for commit in &all {
        for parent in &commit.parents {
            if let Some(&p) = index.get(parent) {
                pending[p] += 1;
            }
        }
    }

    // Fresh commits are ordered by timestamp, then by position in the block.
    let mut ready: BinaryHeap<(i64, Reverse<usize>)> = (saved.len()..all.len())
        .filter(|&i| pending[i] == 0)
        .map(|i| (all[i].timestamp, Reverse(i)))
        .collect();
    let mut next_saved = 0;
    let mut emitted = vec![false; all.len()];
    let mut merged = Vec::with_capacity(all.len());

    while merged.len() < all.len() {
        let saved_candidate = (next_saved < saved.len() && pending[next_saved] == 0).then_some(next_saved);
        let fresh_candidate = ready.peek().map(|&(_, Reverse(i))| i);

        let pick = match (saved_candidate, fresh_candidate) {
            (Some(s), Some(f)) if all[s].timestamp >= all[f].timestamp => s,
            (_, Some(f)) => {
                ready.pop();
                f
            }
            (Some(s), None) => s,
            (None, None) => return Err(stuck(&all, &emitted, &index)),
        };
        if pick == next_saved && pick < saved.len() {
            next_saved += 1;
        }

        for parent in &all[pick].parents {
            if let Some(&p) = index.get(parent) {
                pending[p] -= 1;
                if pending[p] == 0 && p >= saved.len() {
                    ready.push((all[p].timestamp, Reverse(p)));
                }
            }
        }
        emitted[pick] = true;
        merged.push(all[pick].clone());
    }
    Ok(merged)
}

/// Error for a merge that cannot make progress: some commit's child is
/// ordered after it.
fn stuck(all: &[&TimeCommitParents], emitted: &[bool], index: &HashMap<Hash, usize>) -> GraphError {
    for (i, commit) in all.iter().enumerate() {
        if emitted[i] {
            continue;
        }
        for parent in &commit.parents {
            if index.get(parent).is_some_and(|&p| !emitted[p]) {
                return GraphError::MalformedOrder { child: commit.hash, parent: *parent };
            }
        }
    }
    GraphError::InvariantViolation("commit merge stalled without a blocked commit".to_string())
}
