//! Checkout, reset and clone: rewriting the working tree from history

use crate::lock::RepoLock;
use crate::repository::Repository;
use crate::worktree;
use rvc_core::path::to_repo_path;
use rvc_core::store::{LOCK_FILE, RVC_DIR};
use rvc_core::{BlobRef, Error, Result, StorageContext, Store, ValidationError};
use rvc_journal::BranchName;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a reset did to the working tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetStats {
    pub restored: usize,
    pub removed: usize,
}

impl Repository {
    /// Switch to `name` and rewrite the working tree to match it
    ///
    /// Refused while the working tree has uncommitted changes. If rewriting
    /// fails, the current-branch pointer is moved back before the error is
    /// returned.
    pub fn checkout(&self, name: &str) -> Result<ResetStats> {
        let target = BranchName::new(name)?;
        if !self.journal.branch_exists(&target)? {
            return Err(ValidationError::NoSuchBranch(target.to_string()).into());
        }

        let pending = self.uncommitted()?;
        if !pending.is_empty() {
            return Err(Error::Uncommitted(pending.into_iter().collect()));
        }

        let previous = self.journal.current_branch()?;
        self.journal.set_current_branch(&target)?;

        match self.reset() {
            Ok(stats) => {
                self.journal.flush()?;
                tracing::info!("Switched from {} to {}", previous, target);
                Ok(stats)
            }
            Err(e) => {
                tracing::warn!("checkout of {} failed, staying on {}: {}", target, previous, e);
                self.journal.set_current_branch(&previous)?;
                self.journal.flush()?;
                Err(e)
            }
        }
    }

    /// Discard uncommitted changes
    ///
    /// Tracked files are restored to their recorded content, files recorded
    /// as deleted or never recorded are removed, and directories left empty
    /// are pruned. Ignored files are left alone.
    pub fn reset(&self) -> Result<ResetStats> {
        let ignore = self.ignore_list();
        let snapshot = self.snapshot()?;
        let pending = worktree::uncommitted(&self.root, &snapshot, &ignore)?;

        let mut stats = ResetStats::default();
        let mut restores = Vec::new();

        // removals first so restored files never collide with stale entries
        for abs in pending {
            let repo_path = to_repo_path(&self.root, &abs)?;
            match snapshot.get(&repo_path) {
                Some(BlobRef::Present(digest)) => restores.push((abs, digest)),
                _ => {
                    remove_file(&abs)?;
                    tracing::debug!("removed {}", repo_path);
                    stats.removed += 1;
                }
            }
        }

        worktree::prune_empty_dirs(&self.root, &ignore)?;

        for (abs, digest) in restores {
            // never write through a symlink
            if abs.is_symlink() {
                remove_file(&abs)?;
            }
            self.store.blob_store().restore_to(digest, &abs)?;
            tracing::debug!("restored {}", abs.display());
            stats.restored += 1;
        }

        tracing::info!(
            "Reset working tree: {} restored, {} removed",
            stats.restored,
            stats.removed
        );
        Ok(stats)
    }

    /// Clone the repository at `src` into `dst`
    ///
    /// Copies `src/.rvc` while holding the source lock, then materializes the
    /// working tree of the current branch in `dst`.
    pub fn clone_from(src: &Path, dst: &Path) -> Result<Self> {
        if Store::exists(dst) {
            return Err(Error::repository(format!(
                "a repository already exists in {}",
                dst.display()
            )));
        }

        {
            let src_root = src
                .canonicalize()
                .map_err(|_| Error::repository(format!("no valid repository in {}", src.display())))?;
            let source = Store::open(&src_root)?;
            let _lock = RepoLock::acquire(&source.lock_path())?;

            fs::create_dir_all(dst).storage_context(|| format!("creating {}", dst.display()))?;
            copy_rvc_dir(source.rvc_dir(), &dst.join(RVC_DIR))?;
        }

        let repo = Self::open(dst)?;
        repo.reset()?;
        tracing::info!("Cloned {} into {}", src.display(), repo.root().display());
        Ok(repo)
    }
}

fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::storage(format!("removing {}", path.display()), e)),
    }
}

/// Copy a `.rvc` tree verbatim, leaving out the lock file
fn copy_rvc_dir(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
            Error::storage(format!("reading {}", src.display()), source)
        })?;

        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| Error::repository(format!("unexpected path {}", entry.path().display())))?;
        if rel == Path::new(LOCK_FILE) {
            continue;
        }

        let target: PathBuf = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .storage_context(|| format!("creating {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target)
                .storage_context(|| format!("copying to {}", target.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvc_core::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_reset_discards_changes() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let repo = Repository::init(temp_dir.path())?;
        let root = repo.root().to_path_buf();

        fs::write(root.join("kept.txt"), b"original")?;
        repo.commit("add", "alice", ["kept.txt"])?;

        fs::write(root.join("kept.txt"), b"scribbled")?;
        fs::create_dir_all(root.join("scratch/deep"))?;
        fs::write(root.join("scratch/deep/tmp.txt"), b"tmp")?;

        let stats = repo.reset()?;
        assert_eq!(stats, ResetStats { restored: 1, removed: 1 });
        assert_eq!(fs::read(root.join("kept.txt"))?, b"original");
        assert!(!root.join("scratch").exists());
        assert!(repo.uncommitted()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_checkout_unknown_branch() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let repo = Repository::init(temp_dir.path())?;
        let err = repo.checkout("nope").unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::NoSuchBranch(_))));
        Ok(())
    }

    #[test]
    fn test_checkout_refuses_dirty_tree() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let repo = Repository::init(temp_dir.path())?;
        let root = repo.root().to_path_buf();
        repo.create_branch("dev")?;
        fs::write(root.join("new.txt"), b"untracked")?;

        let err = repo.checkout("dev").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Refused);
        match err {
            Error::Uncommitted(paths) => assert_eq!(paths, vec![root.join("new.txt")]),
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(repo.current_branch()?, BranchName::master());
        assert!(root.join("new.txt").exists());
        Ok(())
    }

    #[test]
    fn test_copy_rvc_dir_skips_lock() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let src = temp_dir.path().join("src");
        fs::create_dir_all(src.join("blobs"))?;
        fs::write(src.join("blobs/obj"), b"x")?;
        fs::write(src.join(LOCK_FILE), b"")?;

        let dst = temp_dir.path().join("dst");
        copy_rvc_dir(&src, &dst)?;
        assert_eq!(fs::read(dst.join("blobs/obj"))?, b"x");
        assert!(!dst.join(LOCK_FILE).exists());
        Ok(())
    }
}
