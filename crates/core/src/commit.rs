//! Commit records and their text serialization
//!
//! A commit object is plain text:
//!
//! ```text
//! message=<message>
//! author=<author>
//! time=<unix seconds, hex>
//! ----
//! <path>=<digest or ->
//! ...
//! ```
//!
//! The commit's identity is the SHA-256 of exactly this text.

use crate::blob::BlobRef;
use crate::error::{Error, Result, ValidationError};
use crate::hash::{hash_bytes, Sha256Hash};
use crate::path;

/// Separator between the header and the blob entries
pub const BLOB_SEPARATOR: &str = "----";

/// Maximum commit message length, in characters
pub const MAX_MESSAGE_LEN: usize = 80;

/// One tracked path and its recorded state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Repository-relative, `/`-separated
    pub path: String,
    pub blob: BlobRef,
}

impl Entry {
    pub fn new(path: impl Into<String>, blob: BlobRef) -> Self {
        Self {
            path: path.into(),
            blob,
        }
    }
}

/// An immutable full-snapshot commit record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub message: String,
    pub author: String,
    /// Seconds since the Unix epoch
    pub time: u64,
    pub entries: Vec<Entry>,
}

impl Commit {
    /// Create a commit stamped with the current time
    pub fn new(message: &str, author: &str, entries: Vec<Entry>) -> Self {
        Self {
            message: message.to_string(),
            author: author.replace(|c: char| c.is_control(), " "),
            time: current_timestamp_secs(),
            entries,
        }
    }

    /// Serialize to the on-disk text form
    pub fn serialize(&self) -> String {
        let mut text = format!(
            "message={}\nauthor={}\ntime={:x}\n{}",
            self.message, self.author, self.time, BLOB_SEPARATOR
        );
        for entry in &self.entries {
            text.push('\n');
            text.push_str(&entry.path);
            text.push('=');
            text.push_str(&entry.blob.to_string());
        }
        text
    }

    /// The commit's identity: digest of its serialized text
    pub fn id(&self) -> Sha256Hash {
        hash_bytes(self.serialize().as_bytes())
    }

    /// Parse the on-disk text form
    pub fn parse(text: &str) -> Result<Self> {
        let mut message = None;
        let mut author = None;
        let mut time = None;
        let mut entries = Vec::new();
        let mut in_blobs = false;

        for line in text.lines() {
            if line.is_empty() {
                continue;
            }

            if !in_blobs {
                if line == BLOB_SEPARATOR {
                    in_blobs = true;
                    continue;
                }
                let (key, value) = line
                    .split_once('=')
                    .ok_or_else(|| corrupt(format!("malformed header line '{}'", line)))?;
                match key {
                    "message" => message = Some(value.to_string()),
                    "author" => author = Some(value.to_string()),
                    "time" => {
                        let secs = u64::from_str_radix(value, 16)
                            .map_err(|_| corrupt(format!("invalid time '{}'", value)))?;
                        time = Some(secs);
                    }
                    other => tracing::debug!("ignoring unknown commit header '{}'", other),
                }
                continue;
            }

            // Digests never contain '=', so split on the last one
            let (raw_path, raw_blob) = line
                .rsplit_once('=')
                .ok_or_else(|| corrupt(format!("malformed blob line '{}'", line)))?;
            let path = path::normalize(raw_path);
            if path.is_empty() {
                return Err(corrupt(format!("empty path in blob line '{}'", line)));
            }
            entries.push(Entry::new(path, BlobRef::parse(raw_blob)?));
        }

        if !in_blobs {
            return Err(corrupt("missing blob separator".to_string()));
        }

        Ok(Self {
            message: message.ok_or_else(|| corrupt("missing message".to_string()))?,
            author: author.ok_or_else(|| corrupt("missing author".to_string()))?,
            time: time.ok_or_else(|| corrupt("missing time".to_string()))?,
            entries,
        })
    }
}

/// Check a commit message: non-empty, at most 80 characters, no control characters
pub fn validate_message(message: &str) -> std::result::Result<(), ValidationError> {
    if message.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    let len = message.chars().count();
    if len > MAX_MESSAGE_LEN {
        return Err(ValidationError::MessageTooLong(len));
    }
    if message.chars().any(|c| c.is_control()) {
        return Err(ValidationError::UnprintableMessage);
    }
    Ok(())
}

fn corrupt(msg: String) -> Error {
    Error::repository(format!("corrupt commit object: {}", msg))
}

fn current_timestamp_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
