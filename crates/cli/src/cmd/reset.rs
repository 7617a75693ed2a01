//! Discard uncommitted changes

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rvc_repo::Repository;

pub fn run() -> Result<()> {
    let repo_root = util::find_repo_root().context("Failed to find repository")?;
    let repo = Repository::open(&repo_root)?;

    let stats = repo.reset()?;
    println!(
        "{} Working tree reset to {} ({} restored, {} removed)",
        "✓".green(),
        repo.current_branch()?.to_string().cyan(),
        stats.restored,
        stats.removed
    );
    Ok(())
}
