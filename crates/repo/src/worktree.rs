//! Working-tree differ: compares the live filesystem against a snapshot

use crate::snapshot::Snapshot;
use rvc_core::hash::hash_file;
use rvc_core::path::{to_abs_path, to_repo_path};
use rvc_core::store::RVC_DIR;
use rvc_core::{BlobRef, Error, IgnoreList, Result};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Skip `.rvc` itself and nested repositories below the root
fn is_excluded(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    if entry.file_name() == RVC_DIR {
        return true;
    }
    entry.file_type().is_dir() && entry.path().join(RVC_DIR).is_dir()
}

fn is_ignored_dir(root: &Path, entry: &DirEntry, ignore: &IgnoreList) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && to_repo_path(root, entry.path()).is_ok_and(|p| ignore.is_ignored(&p))
}

fn walk_error(err: walkdir::Error) -> Error {
    let context = match err.path() {
        Some(path) => format!("listing {}", path.display()),
        None => "listing working tree".to_string(),
    };
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop"));
    Error::storage(context, source)
}

/// Every trackable file in the working tree, excluding the reserved directory
///
/// Files whose names cannot be recorded in a commit are skipped with a
/// warning.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_excluded(e))
    {
        let entry = entry.map_err(walk_error)?;
        let file_type = entry.file_type();
        if !(file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())) {
            continue;
        }
        if let Err(e) = to_repo_path(root, entry.path()) {
            tracing::warn!("skipping {:?}: {}", entry.path(), e);
            continue;
        }
        files.push(entry.into_path());
    }

    Ok(files)
}

/// Compute the uncommitted-change set relative to `snapshot`
///
/// A tracked path is pending when its content no longer matches the
/// recorded digest, when it vanished without a recorded deletion, or when
/// it reappeared after one. Any other non-ignored file is untracked and
/// pending as well. Returns absolute paths.
pub fn uncommitted(
    root: &Path,
    snapshot: &Snapshot,
    ignore: &IgnoreList,
) -> Result<BTreeSet<PathBuf>> {
    let mut files: HashSet<PathBuf> = list_files(root)?.into_iter().collect();
    let mut pending = BTreeSet::new();

    for (repo_path, blob) in snapshot.iter() {
        let abs = to_abs_path(root, repo_path);
        let present = files.remove(&abs);

        let changed = match (blob, present) {
            (BlobRef::Deleted, false) => false,
            (BlobRef::Deleted, true) => true,
            (BlobRef::Present(_), false) => true,
            (BlobRef::Present(recorded), true) => hash_file(&abs)? != recorded,
        };

        if changed {
            tracing::debug!("modified: {}", repo_path);
            pending.insert(abs);
        }
    }

    for file in files {
        let repo_path = to_repo_path(root, &file)?;
        if ignore.is_ignored(&repo_path) {
            continue;
        }
        tracing::debug!("untracked: {}", repo_path);
        pending.insert(file);
    }

    Ok(pending)
}

/// Remove now-empty directories under the working tree
///
/// The root, `.rvc`, nested repositories and ignored directories are left
/// alone.
pub fn prune_empty_dirs(root: &Path, ignore: &IgnoreList) -> Result<usize> {
    let mut removed = 0;

    for entry in WalkDir::new(root)
        .follow_links(false)
        .contents_first(true)
        .into_iter()
        .filter_entry(|e| !is_excluded(e) && !is_ignored_dir(root, e, ignore))
    {
        let entry = entry.map_err(walk_error)?;
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            continue;
        }
        // fails on non-empty directories, which is what we want
        if fs::remove_dir(entry.path()).is_ok() {
            tracing::debug!("pruned empty directory {}", entry.path().display());
            removed += 1;
        }
    }

    Ok(removed)
}
