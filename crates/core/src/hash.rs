//! SHA-256 hashing primitives for content-addressed storage

use crate::error::{Error, Result, StorageContext};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Length of a digest in hex characters
pub const HEX_LEN: usize = 64;

/// A SHA-256 hash (32 bytes)
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Sha256Hash([u8; 32]);

impl Sha256Hash {
    /// Create a new Sha256Hash from bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the hash as a byte slice
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != HEX_LEN {
            return Err(Error::repository(format!(
                "invalid digest length: expected {} characters, got {}",
                HEX_LEN,
                s.len()
            )));
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| Error::repository(format!("invalid digest '{}': {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl std::fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sha256Hash({})", self.to_hex())
    }
}

impl std::fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Sha256Hash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// Hash bytes using SHA-256
pub fn hash_bytes(data: &[u8]) -> Sha256Hash {
    let digest: [u8; 32] = Sha256::digest(data).into();
    Sha256Hash::from_bytes(digest)
}

/// Hash a file using SHA-256 (streaming for large files)
pub fn hash_file(path: &Path) -> Result<Sha256Hash> {
    use std::fs::File;
    use std::io::{BufReader, Read};

    let file = File::open(path).storage_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();

    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .storage_context(|| format!("reading {}", path.display()))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let digest: [u8; 32] = hasher.finalize().into();
    Ok(Sha256Hash::from_bytes(digest))
}
