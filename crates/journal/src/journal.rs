//! Association store for branch heads and the commit parent chain, using sled
//!
//! The namespace is flat:
//!
//! ```text
//! current_branch     -> branches.<name>
//! branches.<name>    -> <head commit digest> | -
//! <commit digest>    -> <parent commit digest> | -
//! ```

use crate::branch::{BranchName, BRANCH_PREFIX};
use rvc_core::{Error, Result, Sha256Hash, ValidationError, SENTINEL};
use sled::Db;
use std::collections::HashSet;
use std::path::Path;

/// Key recording which branch is checked out
pub const CURRENT_BRANCH_KEY: &str = "current_branch";

/// Branch and commit-chain pointers for one repository
pub struct Journal {
    db: Db,
}

impl Journal {
    /// Create the store for a fresh repository
    ///
    /// Seeds `branches.master = -` and makes `master` current.
    pub fn create(path: &Path) -> Result<Self> {
        let journal = Self::open_db(path)?;
        let master = BranchName::master();

        journal.insert(&master.key(), SENTINEL)?;
        journal.insert(CURRENT_BRANCH_KEY, &master.key())?;
        journal.flush()?;

        tracing::debug!("created association store at {}", path.display());
        Ok(journal)
    }

    /// Open the store of an existing repository
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::repository(format!(
                "association store missing at {}",
                path.display()
            )));
        }

        let journal = Self::open_db(path)?;
        // fail fast on a store that was never seeded
        journal.current_branch()?;
        Ok(journal)
    }

    fn open_db(path: &Path) -> Result<Self> {
        let db = sled::open(path).map_err(|e| {
            Error::repository(format!(
                "failed to open association store {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self { db })
    }

    /// Name of the checked-out branch
    pub fn current_branch(&self) -> Result<BranchName> {
        let key = self
            .get(CURRENT_BRANCH_KEY)?
            .ok_or_else(|| Error::repository("association store has no current branch"))?;
        BranchName::from_key(&key).map_err(|_| {
            Error::repository(format!("current branch points at invalid key '{}'", key))
        })
    }

    /// Point `current_branch` at another branch (not flushed)
    pub fn set_current_branch(&self, branch: &BranchName) -> Result<()> {
        self.insert(CURRENT_BRANCH_KEY, &branch.key())
    }

    /// All branches, in key order
    pub fn branches(&self) -> Result<Vec<BranchName>> {
        let mut branches = Vec::new();
        for item in self.db.scan_prefix(BRANCH_PREFIX) {
            let (key, _) = item.map_err(|e| sled_error("scanning branches", e))?;
            let key = String::from_utf8_lossy(&key);
            match BranchName::from_key(&key) {
                Ok(name) => branches.push(name),
                Err(_) => tracing::warn!("skipping malformed branch key '{}'", key),
            }
        }
        Ok(branches)
    }

    pub fn branch_exists(&self, branch: &BranchName) -> Result<bool> {
        self.db
            .contains_key(branch.key())
            .map_err(|e| sled_error("looking up branch", e))
    }

    /// Head commit of a branch; `None` when the branch has no commits yet
    pub fn branch_head(&self, branch: &BranchName) -> Result<Option<Sha256Hash>> {
        let value = self
            .get(&branch.key())?
            .ok_or_else(|| ValidationError::NoSuchBranch(branch.to_string()))?;
        decode_pointer(&value)
    }

    /// Add a branch pointing at `head` (not flushed)
    pub fn create_branch(&self, branch: &BranchName, head: Option<Sha256Hash>) -> Result<()> {
        if self.branch_exists(branch)? {
            return Err(ValidationError::BranchExists(branch.to_string()).into());
        }
        self.insert(&branch.key(), &encode_pointer(head))
    }

    /// Parent of a commit; `None` for a root commit
    pub fn parent_of(&self, commit: Sha256Hash) -> Result<Option<Sha256Hash>> {
        let value = self.get(&commit.to_hex())?.ok_or_else(|| {
            Error::repository(format!("commit {} is not linked into any chain", commit))
        })?;
        decode_pointer(&value)
    }

    /// Whether a commit digest is already linked into some chain
    pub fn contains_commit(&self, commit: Sha256Hash) -> Result<bool> {
        self.db
            .contains_key(commit.to_hex())
            .map_err(|e| sled_error("looking up commit", e))
    }

    /// Link `commit` to `parent` and advance `branch` to it
    ///
    /// Both writes go in one sled batch, parent link first, so the branch
    /// head never points at a commit without a chain entry.
    pub fn record_commit(
        &self,
        branch: &BranchName,
        commit: Sha256Hash,
        parent: Option<Sha256Hash>,
    ) -> Result<()> {
        let mut batch = sled::Batch::default();
        batch.insert(commit.to_hex().as_bytes(), encode_pointer(parent).as_bytes());
        batch.insert(branch.key().as_bytes(), commit.to_hex().as_bytes());

        self.db
            .apply_batch(batch)
            .map_err(|e| sled_error("recording commit", e))?;

        tracing::debug!(
            "linked {} -> {} on {}",
            commit,
            encode_pointer(parent),
            branch
        );
        Ok(())
    }

    /// Walk the chain from `head` towards the root
    ///
    /// Returns digests newest first, stopping after `max_depth` commits when
    /// given. Revisiting a commit means the chain loops, which is reported
    /// as corruption.
    pub fn history(
        &self,
        head: Option<Sha256Hash>,
        max_depth: Option<usize>,
    ) -> Result<Vec<Sha256Hash>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = head;

        while let Some(commit) = current {
            if max_depth.is_some_and(|max| chain.len() >= max) {
                break;
            }
            if !seen.insert(commit) {
                return Err(Error::repository(format!(
                    "commit chain loops back to {}",
                    commit
                )));
            }
            chain.push(commit);
            current = self.parent_of(commit)?;
        }

        Ok(chain)
    }

    /// Persist all pending writes
    pub fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| sled_error("syncing association store", e))?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .get(key)
            .map_err(|e| sled_error(format!("reading key '{}'", key), e))?;
        value
            .map(|v| {
                String::from_utf8(v.to_vec())
                    .map_err(|_| Error::repository(format!("value of '{}' is not UTF-8", key)))
            })
            .transpose()
    }

    fn insert(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key, value.as_bytes())
            .map_err(|e| sled_error(format!("writing key '{}'", key), e))?;
        Ok(())
    }
}

fn encode_pointer(digest: Option<Sha256Hash>) -> String {
    match digest {
        Some(hash) => hash.to_hex(),
        None => SENTINEL.to_string(),
    }
}

fn decode_pointer(value: &str) -> Result<Option<Sha256Hash>> {
    if value == SENTINEL {
        Ok(None)
    } else {
        Sha256Hash::from_hex(value).map(Some)
    }
}

fn sled_error(context: impl Into<String>, err: sled::Error) -> Error {
    let source = match err {
        sled::Error::Io(io) => io,
        other => std::io::Error::new(std::io::ErrorKind::Other, other.to_string()),
    };
    Error::storage(context, source)
}
