//! Print the effective configuration

use crate::config;
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let cfg = config::load()?;

    match config::config_file_path() {
        Some(path) if path.exists() => println!("{}", format!("# {}", path.display()).dimmed()),
        Some(path) => println!("{}", format!("# {} (not found, defaults)", path.display()).dimmed()),
        None => println!("{}", "# no config directory, defaults".dimmed()),
    }
    print!("{}", config::render(&cfg)?);
    Ok(())
}
