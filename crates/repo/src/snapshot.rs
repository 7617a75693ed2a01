//! Snapshot builder: the path -> blob mapping implied by a branch's history

use rvc_core::commit::Entry;
use rvc_core::{BlobRef, Commit, IgnoreList, Result, Sha256Hash, Store};
use rvc_journal::Journal;
use std::collections::BTreeMap;

/// Latest recorded state of every path touched by a branch's history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<String, BlobRef>,
}

impl Snapshot {
    /// Reconstruct the snapshot of the history ending at `head`
    ///
    /// Commits are applied oldest first so the newest entry for a path wins.
    /// Ignored paths are never added, even if an old commit recorded them.
    pub fn build(
        store: &Store,
        journal: &Journal,
        head: Option<Sha256Hash>,
        ignore: &IgnoreList,
        max_depth: Option<usize>,
    ) -> Result<Self> {
        let chain = journal.history(head, max_depth)?;
        let mut snapshot = Self::default();

        for id in chain.iter().rev() {
            let commit = store.read_commit(*id)?;
            snapshot.apply(&commit, ignore);
        }

        tracing::debug!(
            "built snapshot of {} paths from {} commits",
            snapshot.len(),
            chain.len()
        );
        Ok(snapshot)
    }

    /// Upsert every non-ignored entry of a commit, in file order
    pub fn apply(&mut self, commit: &Commit, ignore: &IgnoreList) {
        for entry in &commit.entries {
            if ignore.is_ignored(&entry.path) {
                continue;
            }
            self.entries.insert(entry.path.clone(), entry.blob);
        }
    }

    pub fn insert(&mut self, path: String, blob: BlobRef) {
        self.entries.insert(path, blob);
    }

    /// Recorded state of a repository-relative path
    pub fn get(&self, path: &str) -> Option<BlobRef> {
        self.entries.get(path).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, BlobRef)> {
        self.entries.iter().map(|(path, blob)| (path.as_str(), *blob))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert into commit entries, sorted by path
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
            .into_iter()
            .map(|(path, blob)| Entry::new(path, blob))
            .collect()
    }
}
