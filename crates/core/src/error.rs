//! Error taxonomy shared by every rvc crate
//!
//! Failures fall into four kinds: validation errors (rejected before any
//! mutation), repository-state errors (missing or corrupt `.rvc/`), storage
//! errors (I/O failing mid-operation) and safety refusals (checkout over
//! uncommitted work).

use std::path::PathBuf;

/// Result type used throughout rvc
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the version-control engine
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad input: branch names, commit messages, unknown branches
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The repository is missing, corrupt or unavailable
    #[error("repository error: {0}")]
    Repository(String),

    /// An object or pointer write failed mid-operation
    #[error("storage error: {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Checkout refused because it would discard uncommitted work
    #[error("{} file(s) are uncommitted; commit them before checkout", .0.len())]
    Uncommitted(Vec<PathBuf>),
}

/// Input rejected before any repository mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("the branch name '{0}' is invalid")]
    InvalidBranchName(String),

    #[error("the branch '{0}' already exists")]
    BranchExists(String),

    #[error("the branch '{0}' doesn't exist")]
    NoSuchBranch(String),

    #[error("commit message is empty")]
    EmptyMessage,

    #[error("commit message is too long ({0} characters, at most 80)")]
    MessageTooLong(usize),

    #[error("commit messages must not contain unprintable characters")]
    UnprintableMessage,

    #[error("nothing to commit")]
    NothingToCommit,

    #[error("{} is outside the repository", .0.display())]
    OutsideRepository(PathBuf),

    #[error("{} cannot be tracked: paths must be UTF-8 without line breaks", .0.display())]
    UntrackablePath(PathBuf),
}

/// The four failure kinds, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Repository,
    Storage,
    Refused,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Repository(_) => ErrorKind::Repository,
            Error::Storage { .. } => ErrorKind::Storage,
            Error::Uncommitted(_) => ErrorKind::Refused,
        }
    }

    /// Build a repository-state error
    pub fn repository(msg: impl Into<String>) -> Self {
        Error::Repository(msg.into())
    }

    /// Build a storage error from an I/O failure
    pub fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Storage {
            context: context.into(),
            source,
        }
    }
}

/// Attach storage context to I/O results, in the spirit of `anyhow::Context`
pub trait StorageContext<T> {
    fn storage_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T> StorageContext<T> for std::result::Result<T, std::io::Error> {
    fn storage_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|source| Error::storage(f(), source))
    }
}
