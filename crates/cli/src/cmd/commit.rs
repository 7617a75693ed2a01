//! Record changes as a new commit

use crate::config;
use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rvc_repo::Repository;
use std::path::PathBuf;

pub fn run(message: Option<String>, author: Option<String>, paths: &[PathBuf]) -> Result<()> {
    let config = config::load()?;
    let repo_root = util::find_repo_root().context("Failed to find repository")?;
    let repo = Repository::open(&repo_root)?;

    // an absent message is rejected by the engine as empty
    let message = message
        .or_else(|| config.commit.default_message.clone())
        .unwrap_or_default();
    let author = config.author(author.as_deref());

    let paths = paths
        .iter()
        .map(|p| util::absolute_path(p))
        .collect::<Result<Vec<_>>>()?;

    let id = repo.commit(&message, &author, &paths)?;

    println!(
        "{} [{} {}] {}",
        "✓".green(),
        repo.current_branch()?.to_string().cyan(),
        util::short_id(&id).yellow(),
        message
    );
    Ok(())
}
