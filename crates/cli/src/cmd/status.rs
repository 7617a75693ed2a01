//! Show the current branch and uncommitted changes

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rvc_core::BlobRef;
use rvc_repo::Repository;

pub fn run() -> Result<()> {
    let repo_root = util::find_repo_root().context("Failed to find repository")?;
    let repo = Repository::open(&repo_root)?;

    println!("On branch {}", repo.current_branch()?.to_string().cyan());
    match repo.head()? {
        Some(head) => println!("Head:      {}", util::short_id(&head).yellow()),
        None => println!("{}", "No commits yet".dimmed()),
    }
    println!();

    let pending = repo.uncommitted()?;
    if pending.is_empty() {
        println!("{}", "Nothing to commit, working tree clean".dimmed());
        return Ok(());
    }

    let snapshot = repo.snapshot()?;
    println!("{}", "Uncommitted changes:".bold());
    for path in &pending {
        let display = util::display_path(repo.root(), path);
        let recorded = snapshot.get(&display.replace('\\', "/"));
        println!("  {}  {}", change_label(recorded, path.exists()), display);
    }
    println!();
    println!("{}", "Commit them with: rvc commit -m <message> <path>...".dimmed());
    Ok(())
}

/// Label for a pending path given its recorded state and whether it is on disk
fn change_label(recorded: Option<BlobRef>, on_disk: bool) -> String {
    match (recorded, on_disk) {
        // recorded as deleted, so it can only be pending by reappearing
        (Some(BlobRef::Deleted), _) => "re-added: ".green().to_string(),
        (Some(BlobRef::Present(_)), false) => "deleted:  ".red().to_string(),
        (Some(BlobRef::Present(_)), true) => "modified: ".yellow().to_string(),
        (None, _) => "untracked:".green().to_string(),
    }
}
