//! Repository handle: the entry point for every engine operation

use crate::lock::RepoLock;
use crate::snapshot::Snapshot;
use crate::worktree;
use rvc_core::{Commit, Error, IgnoreList, Result, Sha256Hash, StorageContext, Store};
use rvc_journal::{BranchName, Journal};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One `log` record: a commit and its digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: Sha256Hash,
    pub commit: Commit,
}

/// An open rvc repository
///
/// Holds the repository lock until dropped. The association store is
/// closed before the lock is released.
pub struct Repository {
    pub(crate) root: PathBuf,
    pub(crate) store: Store,
    pub(crate) journal: Journal,
    _lock: RepoLock,
}

impl Repository {
    /// Create a new repository at `path`, creating the directory if needed
    pub fn init(path: &Path) -> Result<Self> {
        fs::create_dir_all(path).storage_context(|| format!("creating {}", path.display()))?;
        let root = canonical_root(path)?;

        let store = Store::init(&root)?;
        let lock = RepoLock::acquire(&store.lock_path())?;
        let journal = Journal::create(&store.assoc_store_path())?;

        tracing::info!("Initialized empty repository in {}", root.display());
        Ok(Self {
            root,
            store,
            journal,
            _lock: lock,
        })
    }

    /// Open the repository rooted at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let root = canonical_root(path)?;
        let store = Store::open(&root)?;
        let lock = RepoLock::acquire(&store.lock_path())?;
        let journal = Journal::open(&store.assoc_store_path())?;

        tracing::debug!("opened repository {}", root.display());
        Ok(Self {
            root,
            store,
            journal,
            _lock: lock,
        })
    }

    /// Canonical working-tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The checked-out branch
    pub fn current_branch(&self) -> Result<BranchName> {
        self.journal.current_branch()
    }

    /// Every branch, sorted by name
    pub fn list_branches(&self) -> Result<Vec<BranchName>> {
        self.journal.branches()
    }

    /// Create a branch at the current branch's head
    ///
    /// Never touches the working tree or the current-branch pointer.
    pub fn create_branch(&self, name: &str) -> Result<BranchName> {
        let branch = BranchName::new(name)?;
        let head = self.head()?;

        self.journal.create_branch(&branch, head)?;
        self.journal.flush()?;

        tracing::info!(
            "Created branch {} at {}",
            branch,
            head.map_or_else(|| "empty history".to_string(), |h| h.to_string())
        );
        Ok(branch)
    }

    /// Head commit of the checked-out branch
    pub fn head(&self) -> Result<Option<Sha256Hash>> {
        let branch = self.journal.current_branch()?;
        self.journal.branch_head(&branch)
    }

    /// The ignore list as currently on disk
    pub fn ignore_list(&self) -> IgnoreList {
        IgnoreList::load(&self.root)
    }

    /// Snapshot of the checked-out branch's full history
    pub fn snapshot(&self) -> Result<Snapshot> {
        let ignore = self.ignore_list();
        Snapshot::build(&self.store, &self.journal, self.head()?, &ignore, None)
    }

    /// Absolute paths with uncommitted changes; empty means clean
    pub fn uncommitted(&self) -> Result<BTreeSet<PathBuf>> {
        let ignore = self.ignore_list();
        let snapshot = Snapshot::build(&self.store, &self.journal, self.head()?, &ignore, None)?;
        worktree::uncommitted(&self.root, &snapshot, &ignore)
    }

    /// Full history of the checked-out branch, newest first
    pub fn log(&self) -> Result<Vec<LogEntry>> {
        self.walk_log(None)
    }

    /// At most `limit` commits of history, newest first
    pub fn log_limited(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.walk_log(Some(limit))
    }

    fn walk_log(&self, max_depth: Option<usize>) -> Result<Vec<LogEntry>> {
        self.journal
            .history(self.head()?, max_depth)?
            .into_iter()
            .map(|id| {
                Ok(LogEntry {
                    id,
                    commit: self.store.read_commit(id)?,
                })
            })
            .collect()
    }
}

fn canonical_root(path: &Path) -> Result<PathBuf> {
    let root = path.canonicalize().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::repository(format!("no valid repository in {}", path.display()))
        } else {
            Error::storage(format!("resolving {}", path.display()), e)
        }
    })?;
    if !root.is_dir() {
        return Err(Error::repository(format!(
            "{} is not a directory",
            root.display()
        )));
    }
    Ok(root)
}
