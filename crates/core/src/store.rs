//! On-disk layout of an rvc repository
//!
//! ```text
//! <root>/
//!   .rvc_ignore          optional ignore list
//!   .rvc/
//!     branches.db        association store (branch heads, parent chain)
//!     commits/<digest>   commit records
//!     blobs/<digest>     file contents
//!     lock               advisory lock, held while a handle is open
//! ```

use crate::blob::BlobStore;
use crate::commit::Commit;
use crate::error::{Error, Result, StorageContext};
use crate::hash::Sha256Hash;
use std::fs;
use std::path::{Path, PathBuf};

/// Reserved repository subdirectory
pub const RVC_DIR: &str = ".rvc";
/// Association store name inside `.rvc/`
pub const ASSOC_STORE: &str = "branches.db";
pub const COMMITS_DIR: &str = "commits";
pub const BLOBS_DIR: &str = "blobs";
pub const LOCK_FILE: &str = "lock";

/// Object storage for one repository: blobs and commit records
#[derive(Debug, Clone)]
pub struct Store {
    /// Root of the working tree
    root: PathBuf,
    /// Path to the .rvc directory
    rvc_dir: PathBuf,
    blob_store: BlobStore,
    commit_store: BlobStore,
}

impl Store {
    /// Create the `.rvc/` object directories at the given root
    ///
    /// The association store is created separately by the journal.
    pub fn init(repo_root: &Path) -> Result<Self> {
        let rvc_dir = repo_root.join(RVC_DIR);

        if rvc_dir.exists() {
            return Err(Error::repository(format!(
                "a repository already exists in {}",
                repo_root.display()
            )));
        }

        for dir in [COMMITS_DIR, BLOBS_DIR] {
            let path = rvc_dir.join(dir);
            fs::create_dir_all(&path)
                .storage_context(|| format!("creating {}", path.display()))?;
        }

        tracing::debug!("created object directories in {}", rvc_dir.display());
        Ok(Self::at(repo_root, rvc_dir))
    }

    /// Open the object storage of an existing repository
    ///
    /// Fails fast when any of the three required members is missing.
    pub fn open(repo_root: &Path) -> Result<Self> {
        let rvc_dir = repo_root.join(RVC_DIR);

        if !rvc_dir.is_dir() {
            return Err(Error::repository(format!(
                "no valid repository in {}",
                repo_root.display()
            )));
        }

        for member in [ASSOC_STORE, COMMITS_DIR, BLOBS_DIR] {
            let path = rvc_dir.join(member);
            if !path.exists() {
                return Err(Error::repository(format!(
                    "corrupt repository: {} doesn't exist",
                    path.display()
                )));
            }
        }

        Ok(Self::at(repo_root, rvc_dir))
    }

    /// Whether `.rvc/` exists at this root (without validating it)
    pub fn exists(repo_root: &Path) -> bool {
        repo_root.join(RVC_DIR).is_dir()
    }

    fn at(repo_root: &Path, rvc_dir: PathBuf) -> Self {
        Self {
            root: repo_root.to_path_buf(),
            blob_store: BlobStore::new(rvc_dir.join(BLOBS_DIR)),
            commit_store: BlobStore::new(rvc_dir.join(COMMITS_DIR)),
            rvc_dir,
        }
    }

    /// Write a commit record, returning its digest
    pub fn write_commit(&self, commit: &Commit) -> Result<Sha256Hash> {
        let text = commit.serialize();
        let hash = self.commit_store.write_blob(text.as_bytes())?;
        tracing::debug!("wrote commit object {}", hash);
        Ok(hash)
    }

    /// Read and parse a commit record
    pub fn read_commit(&self, hash: Sha256Hash) -> Result<Commit> {
        let bytes = self.commit_store.read_blob(hash)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| Error::repository(format!("commit {} is not valid UTF-8", hash)))?;
        Commit::parse(&text)
    }

    /// Get the blob store
    pub fn blob_store(&self) -> &BlobStore {
        &self.blob_store
    }

    /// Get the commit object store
    pub fn commit_store(&self) -> &BlobStore {
        &self.commit_store
    }

    /// Get the repository root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .rvc directory path
    pub fn rvc_dir(&self) -> &Path {
        &self.rvc_dir
    }

    /// Path of the association store
    pub fn assoc_store_path(&self) -> PathBuf {
        self.rvc_dir.join(ASSOC_STORE)
    }

    /// Path of the advisory lock file
    pub fn lock_path(&self) -> PathBuf {
        self.rvc_dir.join(LOCK_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::BlobRef;
    use crate::commit::Entry;
    use tempfile::TempDir;

    fn init_with_assoc(root: &Path) -> Result<Store> {
        let store = Store::init(root)?;
        fs::create_dir_all(store.assoc_store_path()).unwrap();
        Ok(store)
    }

    #[test]
    fn test_init_creates_layout() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let store = Store::init(temp_dir.path())?;

        assert!(store.rvc_dir().join(COMMITS_DIR).is_dir());
        assert!(store.rvc_dir().join(BLOBS_DIR).is_dir());
        assert!(Store::exists(temp_dir.path()));
        Ok(())
    }

    #[test]
    fn test_init_twice_fails() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        Store::init(temp_dir.path())?;
        let err = Store::init(temp_dir.path()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Repository);
        Ok(())
    }

    #[test]
    fn test_open_requires_all_members() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        assert!(Store::open(temp_dir.path()).is_err());

        Store::init(temp_dir.path())?;
        // association store still missing
        assert!(Store::open(temp_dir.path()).is_err());

        fs::create_dir_all(temp_dir.path().join(RVC_DIR).join(ASSOC_STORE))?;
        assert!(Store::open(temp_dir.path()).is_ok());

        fs::remove_dir_all(temp_dir.path().join(RVC_DIR).join(BLOBS_DIR))?;
        let err = Store::open(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("corrupt repository"));
        Ok(())
    }

    #[test]
    fn test_commit_roundtrip_through_store() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let store = init_with_assoc(temp_dir.path())?;

        let blob = store.blob_store().write_blob(b"hi")?;
        let commit = Commit::new("init", "bob", vec![Entry::new("a.txt", BlobRef::Present(blob))]);

        let hash = store.write_commit(&commit)?;
        assert_eq!(hash, commit.id());
        assert!(store.commit_store().blob_path(hash).is_file());
        assert_eq!(store.read_commit(hash)?, commit);
        Ok(())
    }
}
