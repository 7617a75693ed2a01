//! Copy a repository and materialize its working tree

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rvc_repo::Repository;
use std::path::Path;

pub fn run(src: &Path, dst: &Path) -> Result<()> {
    let src = util::absolute_path(src)?;
    let dst = util::absolute_path(dst)?;

    let repo = Repository::clone_from(&src, &dst)
        .with_context(|| format!("Failed to clone {} into {}", src.display(), dst.display()))?;

    println!(
        "{} Cloned {} into {} (branch {})",
        "✓".green(),
        src.display(),
        repo.root().display().to_string().cyan(),
        repo.current_branch()?.to_string().cyan()
    );
    Ok(())
}
