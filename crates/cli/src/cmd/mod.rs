//! CLI command implementations

pub mod branch;
pub mod checkout;
pub mod clone;
pub mod commit;
pub mod config;
pub mod init;
pub mod log;
pub mod reset;
pub mod status;
