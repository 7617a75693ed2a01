//! Branch pointers and commit chain for rvc
//!
//! This crate provides:
//! - Validated branch names
//! - The association store (sled embedded DB) holding branch heads, the
//!   current branch and the commit parent chain
//! - Chain traversal

pub mod branch;
pub mod journal;

// Re-exports
pub use branch::{BranchName, BRANCH_PREFIX, DEFAULT_BRANCH};
pub use journal::{Journal, CURRENT_BRANCH_KEY};
