//! Commit chain: record selected working-tree changes as a new commit

use crate::repository::Repository;
use crate::snapshot::Snapshot;
use crate::worktree;
use rvc_core::path::{absolutize, to_repo_path};
use rvc_core::{validate_message, Commit, Result, Sha256Hash, ValidationError};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

impl Repository {
    /// Commit the pending changes under `paths` to the current branch
    ///
    /// Relative paths are resolved against the repository root. A path
    /// naming a directory selects every pending change beneath it. Requested
    /// paths without pending changes are skipped with a warning; if nothing
    /// remains the commit fails without touching the branch head.
    pub fn commit<I, P>(&self, message: &str, author: &str, paths: I) -> Result<Sha256Hash>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        validate_message(message)?;

        let branch = self.journal.current_branch()?;
        let parent = self.journal.branch_head(&branch)?;
        let ignore = self.ignore_list();
        let mut snapshot = Snapshot::build(&self.store, &self.journal, parent, &ignore, None)?;
        let pending = worktree::uncommitted(&self.root, &snapshot, &ignore)?;

        let mut selected = BTreeSet::new();
        for requested in paths {
            let requested = self.resolve(requested.as_ref())?;
            let before = selected.len();
            selected.extend(
                pending
                    .iter()
                    .filter(|p| p.starts_with(&requested))
                    .cloned(),
            );
            if selected.len() == before {
                tracing::warn!(
                    "{} has no uncommitted changes, skipping",
                    requested.display()
                );
            }
        }

        if selected.is_empty() {
            return Err(ValidationError::NothingToCommit.into());
        }

        for abs in &selected {
            let repo_path = to_repo_path(&self.root, abs)?;
            let blob = self.store.blob_store().put_file(abs)?;
            tracing::debug!("staged {}={}", repo_path, blob);
            snapshot.insert(repo_path, blob);
        }

        let mut commit = Commit::new(message, author, snapshot.into_entries());
        // same content in the same second would reuse an existing digest and
        // link the chain back onto itself
        while self.journal.contains_commit(commit.id())? {
            commit.time += 1;
        }

        let id = self.store.write_commit(&commit)?;
        self.journal.record_commit(&branch, id, parent)?;
        self.journal.flush()?;

        tracing::info!(
            "Committed {} file(s) to {} as {}",
            selected.len(),
            branch,
            id
        );
        Ok(id)
    }

    /// Resolve a requested path to an absolute path inside the working tree
    fn resolve(&self, requested: &Path) -> Result<PathBuf> {
        let abs = absolutize(&self.root, requested);
        if abs.starts_with(&self.root) {
            return Ok(abs);
        }

        // the caller may have reached the root through a symlink
        if let (Some(parent), Some(name)) = (abs.parent(), abs.file_name()) {
            if let Ok(parent) = parent.canonicalize() {
                let resolved = parent.join(name);
                if resolved.starts_with(&self.root) {
                    return Ok(resolved);
                }
            }
        }
        if let Ok(resolved) = abs.canonicalize() {
            if resolved.starts_with(&self.root) {
                return Ok(resolved);
            }
        }

        Err(ValidationError::OutsideRepository(abs).into())
    }
}
