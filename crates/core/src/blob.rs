//! Content-addressed object storage
//!
//! Objects are stored raw under `<dir>/<hex digest>`, one file per unique
//! digest. The same store type backs both `.rvc/blobs/` (file contents) and
//! `.rvc/commits/` (commit records).

use crate::error::{Error, Result, StorageContext};
use crate::hash::{hash_bytes, Sha256Hash};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// On-disk marker for "no parent" and "file absent"
pub const SENTINEL: &str = "-";

/// The recorded state of a path: its content digest, or deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobRef {
    Present(Sha256Hash),
    Deleted,
}

impl BlobRef {
    /// Parse the on-disk form: a hex digest or the sentinel
    pub fn parse(s: &str) -> Result<Self> {
        if s == SENTINEL {
            Ok(BlobRef::Deleted)
        } else {
            Ok(BlobRef::Present(Sha256Hash::from_hex(s)?))
        }
    }

    pub fn digest(&self) -> Option<Sha256Hash> {
        match self {
            BlobRef::Present(hash) => Some(*hash),
            BlobRef::Deleted => None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, BlobRef::Deleted)
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobRef::Present(hash) => write!(f, "{}", hash),
            BlobRef::Deleted => f.write_str(SENTINEL),
        }
    }
}

/// Write-once object directory keyed by SHA-256 of the content
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Create a blob store rooted at an existing directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the object with this digest
    pub fn blob_path(&self, hash: Sha256Hash) -> PathBuf {
        self.root.join(hash.to_hex())
    }

    /// Check if an object exists
    pub fn has_blob(&self, hash: Sha256Hash) -> bool {
        self.blob_path(hash).is_file()
    }

    /// Store bytes, returning their digest
    ///
    /// A no-op when an object with the same digest is already present.
    pub fn write_blob(&self, data: &[u8]) -> Result<Sha256Hash> {
        let hash = hash_bytes(data);
        let blob_path = self.blob_path(hash);
        if blob_path.exists() {
            tracing::debug!("object {} already stored", hash);
            return Ok(hash);
        }

        // Atomic write pattern: temp file in the same directory, fsync, rename
        let mut temp = tempfile::NamedTempFile::new_in(&self.root)
            .storage_context(|| format!("creating temp object in {}", self.root.display()))?;
        temp.write_all(data)
            .storage_context(|| format!("writing object {}", hash))?;
        temp.as_file()
            .sync_all()
            .storage_context(|| format!("syncing object {}", hash))?;
        temp.persist(&blob_path)
            .map_err(|e| Error::storage(format!("persisting object {}", hash), e.error))?;

        if let Ok(dir) = fs::File::open(&self.root) {
            let _ = dir.sync_all(); // best effort, not supported everywhere
        }

        tracing::debug!("stored object {} ({} bytes)", hash, data.len());
        Ok(hash)
    }

    /// Store the current content of a working file
    ///
    /// Returns [`BlobRef::Deleted`] when the file does not exist, which is
    /// how deletions are recorded.
    pub fn put_file(&self, path: &Path) -> Result<BlobRef> {
        if !path.is_file() {
            return Ok(BlobRef::Deleted);
        }
        let data = fs::read(path).storage_context(|| format!("reading {}", path.display()))?;
        Ok(BlobRef::Present(self.write_blob(&data)?))
    }

    /// Read an object, verifying it still hashes to its name
    pub fn read_blob(&self, hash: Sha256Hash) -> Result<Vec<u8>> {
        let blob_path = self.blob_path(hash);
        if !blob_path.exists() {
            return Err(Error::repository(format!("object not found: {}", hash)));
        }

        let data = fs::read(&blob_path)
            .storage_context(|| format!("reading object {}", hash))?;

        let actual = hash_bytes(&data);
        if actual != hash {
            return Err(Error::repository(format!(
                "corrupt object: expected {}, got {}",
                hash, actual
            )));
        }

        Ok(data)
    }

    /// Write an object's content to `dst`, creating parent directories
    pub fn restore_to(&self, hash: Sha256Hash, dst: &Path) -> Result<()> {
        let content = self.read_blob(hash)?;
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)
                .storage_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(dst, content).storage_context(|| format!("writing {}", dst.display()))?;
        Ok(())
    }
}
