//! Advisory lock scoping a repository handle
//!
//! Every [`Repository`](crate::Repository) holds an exclusive `flock` on
//! `.rvc/lock` for its lifetime, so two handles (in one process or two) never
//! mutate the same repository at once.

use rvc_core::{Error, Result, StorageContext};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Exclusive repository lock, released on drop
#[derive(Debug)]
pub struct RepoLock {
    path: PathBuf,
    #[allow(dead_code)]
    file: File,
}

impl RepoLock {
    /// Acquire the lock (non-blocking, fails if already held)
    pub fn acquire(lock_path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(lock_path)
            .storage_context(|| format!("opening lock file {}", lock_path.display()))?;

        if !try_flock_exclusive(&file)? {
            return Err(Error::repository(format!(
                "repository is locked by another process ({})",
                lock_path.display()
            )));
        }

        tracing::debug!("acquired {}", lock_path.display());
        Ok(Self {
            path: lock_path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Try to acquire exclusive file lock (non-blocking)
#[cfg(unix)]
fn try_flock_exclusive(file: &File) -> Result<bool> {
    use nix::fcntl::{flock, FlockArg};
    use std::os::unix::io::AsRawFd;

    match flock(file.as_raw_fd(), FlockArg::LockExclusiveNonblock) {
        Ok(_) => Ok(true),
        Err(nix::errno::Errno::EWOULDBLOCK) => Ok(false),
        Err(e) => Err(Error::storage("locking repository", std::io::Error::from(e))),
    }
}

#[cfg(not(unix))]
fn try_flock_exclusive(_file: &File) -> Result<bool> {
    // No advisory locking on this platform; callers serialize access themselves
    Ok(true)
}
