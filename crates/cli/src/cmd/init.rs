//! Create a new repository

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rvc_repo::Repository;
use std::path::Path;

pub fn run(path: Option<&Path>) -> Result<()> {
    let target = match path {
        Some(p) => crate::util::absolute_path(p)?,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let repo = Repository::init(&target)
        .with_context(|| format!("Failed to initialize repository in {}", target.display()))?;

    println!(
        "{} Initialized empty rvc repository in {}",
        "✓".green(),
        repo.root().display().to_string().cyan()
    );
    println!("  Current branch: {}", repo.current_branch()?.to_string().cyan());
    Ok(())
}
