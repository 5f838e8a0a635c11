// src/test_utils.rs

use crate::model::{Hash, Ref, RefType, TimeCommitParents};

/// Hash from a short hex name, left-padded with zeros.
pub fn h(name: &str) -> Hash {
    format!("{:0>40}", name).parse().unwrap()
}

pub fn commit(timestamp: i64, hash: &str, parents: &[&str]) -> TimeCommitParents {
    TimeCommitParents::new(timestamp, h(hash), parents.iter().map(|p| h(p)).collect())
}

pub fn branch(name: &str, hash: &str) -> Ref {
    Ref::new(h(hash), name, RefType::LocalBranch)
}
