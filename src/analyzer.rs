// src/analyzer.rs

use crate::error::Result;
use crate::model::{CommitRecord, Hash, Ref, RefType, TimeCommitParents};
use git2::{Repository, Sort};
use indicatif::ProgressBar;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

const STASH_REF: &str = "refs/stash";

/// Commits and refs read from a repository
#[derive(Debug, Clone)]
pub struct LoadedLog {
    /// Children before parents, newest first.
    pub records: Vec<CommitRecord>,
    pub refs: Vec<Ref>,
}

impl LoadedLog {
    pub fn commits(&self) -> Vec<TimeCommitParents> {
        self.records.iter().map(|r| r.commit.clone()).collect()
    }

    pub fn record(&self, node: usize) -> Option<&CommitRecord> {
        self.records.get(node)
    }
}

/// Reads up to `limit` commits reachable from any branch, tag, the stash or
/// HEAD. Parents past the limit are left unloaded, and refs pointing past it
/// are left out.
pub fn load_repository(repo_path: &Path, limit: Option<usize>) -> Result<LoadedLog> {
    let repo = Repository::open(repo_path)?;
    info!(path = %repo_path.display(), "loading repository");

    let mut refs = read_refs(&repo)?;

    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
    revwalk.push_glob("refs/heads")?;
    revwalk.push_glob("refs/remotes")?;
    revwalk.push_glob("refs/tags")?;
    if repo.find_reference(STASH_REF).is_ok() {
        revwalk.push_ref(STASH_REF)?;
    }
    if let Some(head) = refs.iter().find(|r| r.ref_type == RefType::Head) {
        revwalk.push(git2::Oid::from_bytes(head.hash.as_bytes())?)?;
    }

    let mut oids = Vec::new();
    for oid in revwalk {
        if limit.is_some_and(|limit| oids.len() >= limit) {
            break;
        }
        oids.push(oid?);
    }

    let bar = ProgressBar::new(oids.len() as u64);
    bar.set_message("Reading commits");

    let mut records = Vec::with_capacity(oids.len());
    for oid in oids {
        let commit = repo.find_commit(oid)?;
        let author = commit.author();
        records.push(CommitRecord {
            commit: TimeCommitParents::new(
                commit.time().seconds(),
                oid.into(),
                commit.parent_ids().map(Hash::from).collect(),
            ),
            author: author.name().unwrap_or("Unknown").to_string(),
            message: commit.message().unwrap_or("").to_string(),
        });
        bar.inc(1);
    }
    bar.finish_and_clear();

    let loaded: HashSet<Hash> = records.iter().map(|r| r.commit.hash).collect();
    refs.retain(|r| {
        let keep = loaded.contains(&r.hash);
        if !keep {
            debug!(name = %r.name, commit = %r.hash.short(), "dropping ref past the commit limit");
        }
        keep
    });

    info!(commits = records.len(), refs = refs.len(), "repository loaded");
    Ok(LoadedLog { records, refs })
}

fn read_refs(repo: &Repository) -> Result<Vec<Ref>> {
    let mut refs = Vec::new();

    // An unborn HEAD has nothing to point at
    if let Ok(head) = repo.head() {
        if let Ok(commit) = head.peel_to_commit() {
            refs.push(Ref::new(commit.id().into(), "HEAD", RefType::Head));
        }
    }

    for reference in repo.references()? {
        let reference = reference?;
        let Some(name) = reference.name() else { continue };
        let ref_type = if name.starts_with("refs/heads/") {
            RefType::LocalBranch
        } else if name.starts_with("refs/remotes/") {
            RefType::RemoteBranch
        } else if name.starts_with("refs/tags/") {
            RefType::Tag
        } else if name == STASH_REF {
            RefType::Stash
        } else {
            continue;
        };
        let short = reference.shorthand().unwrap_or(name).to_string();
        match reference.peel_to_commit() {
            Ok(commit) => refs.push(Ref::new(commit.id().into(), short, ref_type)),
            Err(e) => debug!(name, error = %e, "skipping ref that does not point to a commit"),
        }
    }

    refs.sort();
    Ok(refs)
}
