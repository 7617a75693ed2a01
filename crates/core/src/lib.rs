//! rvc core - content-addressed storage primitives
//!
//! This crate provides the foundational storage layer:
//! - SHA-256 hashing
//! - Write-once blob and commit object storage
//! - Commit record text format
//! - Ignore list and repository-relative paths
//! - `.rvc/` layout management
//! - The error taxonomy shared by every rvc crate

pub mod blob;
pub mod commit;
pub mod error;
pub mod hash;
pub mod ignore;
pub mod path;
pub mod store;

// Re-export main types for convenience
pub use blob::{BlobRef, BlobStore, SENTINEL};
pub use commit::{validate_message, Commit, Entry};
pub use error::{Error, ErrorKind, Result, StorageContext, ValidationError};
pub use hash::Sha256Hash;
pub use ignore::IgnoreList;
pub use store::Store;
