//! Display commit history of the current branch

use crate::config;
use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rvc_repo::{LogEntry, Repository};

pub fn run(limit: Option<usize>) -> Result<()> {
    let config = config::load()?;
    let repo_root = util::find_repo_root().context("Failed to find repository")?;
    let repo = Repository::open(&repo_root)?;

    let entries = match config.log_limit(limit) {
        Some(n) => repo.log_limited(n)?,
        None => repo.log()?,
    };

    if entries.is_empty() {
        println!("{}", "No commits yet".dimmed());
        return Ok(());
    }

    for entry in &entries {
        display_entry(entry);
    }
    Ok(())
}

fn display_entry(entry: &LogEntry) {
    let commit = &entry.commit;
    println!("{} {}", "commit".yellow(), entry.id.to_hex().yellow());
    println!("Author: {}", commit.author);
    println!(
        "Date:   {} ({})",
        util::format_absolute_time(commit.time),
        util::format_relative_time(commit.time).dimmed()
    );
    println!();
    println!("    {}", commit.message);
    println!();
}
