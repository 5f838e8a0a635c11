// src/model.rs

use crate::error::GraphError;
use std::fmt;
use std::str::FromStr;

/// Length of a commit hash in bytes (SHA-1)
pub const HASH_LEN: usize = 20;

/// Fixed-length commit identifier. Equality and ordering are byte-wise.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash([u8; HASH_LEN]);

impl Hash {
    pub const fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Hash(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// First seven hex digits, the way `git log --oneline` shows them
    pub fn short(&self) -> String {
        let mut s = self.to_string();
        s.truncate(7);
        s
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.short())
    }
}

impl FromStr for Hash {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != HASH_LEN * 2 || !s.is_ascii() {
            return Err(GraphError::InvalidHash(s.to_string()));
        }
        let mut bytes = [0u8; HASH_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|_| GraphError::InvalidHash(s.to_string()))?;
        }
        Ok(Hash(bytes))
    }
}

impl From<git2::Oid> for Hash {
    fn from(oid: git2::Oid) -> Self {
        let mut bytes = [0u8; HASH_LEN];
        bytes.copy_from_slice(oid.as_bytes());
        Hash(bytes)
    }
}

/// Opaque handle to a commit. Never recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommitId(pub Hash);

impl CommitId {
    pub fn hash(&self) -> Hash {
        self.0
    }
}

impl From<Hash> for CommitId {
    fn from(hash: Hash) -> Self {
        CommitId(hash)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A parsed log record. Parents are in the order the VCS reports them,
/// the first one being the main-line parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeCommitParents {
    pub timestamp: i64,
    pub hash: Hash,
    pub parents: Vec<Hash>,
}

impl TimeCommitParents {
    pub fn new(timestamp: i64, hash: Hash, parents: Vec<Hash>) -> Self {
        Self { timestamp, hash, parents }
    }

    pub fn id(&self) -> CommitId {
        CommitId(self.hash)
    }
}

/// Full commit record as delivered by a data source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub commit: TimeCommitParents,
    pub author: String,
    pub message: String,
}

impl CommitRecord {
    /// Subject line of the message
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RefType {
    Head,
    LocalBranch,
    RemoteBranch,
    Tag,
    Stash,
}

impl RefType {
    /// Whether a ref of this type marks the head of a branch line
    pub fn is_branch(self) -> bool {
        matches!(self, RefType::Head | RefType::LocalBranch | RefType::RemoteBranch)
    }
}

/// A named pointer to a commit
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ref {
    pub hash: Hash,
    pub name: String,
    pub ref_type: RefType,
}

impl Ref {
    pub fn new(hash: Hash, name: impl Into<String>, ref_type: RefType) -> Self {
        Self { hash, name: name.into(), ref_type }
    }
}
