//! rvc repo - the version-control engine
//!
//! Ties the object store and association store together into the
//! operations exposed to the command line:
//! - Snapshot reconstruction from a branch's commit chain
//! - Working-tree diffing against that snapshot
//! - Committing, branching, checkout, reset and clone
//!
//! ```no_run
//! use rvc_repo::Repository;
//! # fn main() -> rvc_core::Result<()> {
//! let repo = Repository::init(std::path::Path::new("/tmp/r"))?;
//! std::fs::write("/tmp/r/a.txt", "hi").ok();
//! repo.commit("init", "bob", ["/tmp/r/a.txt"])?;
//! repo.create_branch("dev")?;
//! repo.checkout("dev")?;
//! # Ok(())
//! # }
//! ```

mod checkout;
mod commit;
pub mod lock;
mod repository;
pub mod snapshot;
pub mod worktree;

pub use checkout::ResetStats;
pub use lock::RepoLock;
pub use repository::{LogEntry, Repository};
pub use snapshot::Snapshot;
