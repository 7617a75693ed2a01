//! Switch branches

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rvc_core::Error;
use rvc_repo::Repository;

pub fn run(name: &str) -> Result<()> {
    let repo_root = util::find_repo_root().context("Failed to find repository")?;
    let repo = Repository::open(&repo_root)?;

    match repo.checkout(name) {
        Ok(stats) => {
            println!("{} Switched to branch {}", "✓".green(), name.cyan());
            if stats.restored + stats.removed > 0 {
                println!(
                    "  {}",
                    format!("{} restored, {} removed", stats.restored, stats.removed).dimmed()
                );
            }
            Ok(())
        }
        Err(Error::Uncommitted(paths)) => {
            eprintln!("{}", "Checkout refused: uncommitted changes would be lost".red());
            for path in &paths {
                eprintln!("  {}", util::display_path(repo.root(), path));
            }
            anyhow::bail!("{} uncommitted file(s); commit or reset them first", paths.len())
        }
        Err(e) => Err(e.into()),
    }
}
