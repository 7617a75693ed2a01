//! List or create branches

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rvc_repo::Repository;

pub fn run(name: Option<&str>) -> Result<()> {
    let repo_root = util::find_repo_root().context("Failed to find repository")?;
    let repo = Repository::open(&repo_root)?;

    match name {
        Some(name) => create(&repo, name),
        None => list(&repo),
    }
}

fn list(repo: &Repository) -> Result<()> {
    let current = repo.current_branch()?;
    for branch in repo.list_branches()? {
        if branch == current {
            println!("{} {}", "*".green(), branch.to_string().green().bold());
        } else {
            println!("  {}", branch);
        }
    }
    Ok(())
}

fn create(repo: &Repository, name: &str) -> Result<()> {
    let branch = repo.create_branch(name)?;
    let at = match repo.head()? {
        Some(head) => util::short_id(&head),
        None => "empty history".to_string(),
    };
    println!("{} Created branch {} at {}", "✓".green(), branch.to_string().cyan(), at.dimmed());
    Ok(())
}
