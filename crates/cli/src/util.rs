//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use rvc_core::store::RVC_DIR;
use rvc_core::Sha256Hash;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Find repository root by walking up from cwd to find .rvc/
pub fn find_repo_root() -> Result<PathBuf> {
    let current = std::env::current_dir().context("Failed to get current directory")?;
    find_repo_root_from(&current)
}

/// Find the first ancestor of `start` (inclusive) containing .rvc/
pub fn find_repo_root_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(RVC_DIR).is_dir() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => anyhow::bail!("Not an rvc repository (no .rvc directory found)"),
        }
    }
}

/// Make a command-line path absolute against the current directory
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(cwd.join(path))
}

/// Display a path relative to the repository root when possible
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// First 8 hex characters of a digest
pub fn short_id(id: &Sha256Hash) -> String {
    id.to_hex()[..8].to_string()
}

/// Format timestamp as relative time ("2 hours ago")
pub fn format_relative_time(ts_secs: u64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    describe_age(now, ts_secs)
}

fn describe_age(now: u64, then: u64) -> String {
    const UNITS: [(u64, &str); 4] = [
        (604_800, "weeks"),
        (86_400, "days"),
        (3_600, "hours"),
        (60, "minutes"),
    ];

    let Some(age) = now.checked_sub(then) else {
        return "in the future".to_string();
    };
    UNITS
        .iter()
        .find(|(len, _)| age >= *len)
        .map(|(len, unit)| format!("{} {} ago", age / len, unit))
        .unwrap_or_else(|| format!("{} seconds ago", age))
}

/// Format timestamp as absolute UTC time ("2024-01-03 14:30:00")
pub fn format_absolute_time(secs: u64) -> String {
    let (year, month, day) = date_from_days(secs / 86_400);
    let time_of_day = secs % 86_400;
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year,
        month,
        day,
        time_of_day / 3_600,
        time_of_day % 3_600 / 60,
        time_of_day % 60
    )
}

fn is_leap(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Gregorian (year, month, day) for a count of days since 1970-01-01
fn date_from_days(mut days: u64) -> (u64, u64, u64) {
    let mut year = 1970;
    loop {
        let len = if is_leap(year) { 366 } else { 365 };
        if days < len {
            break;
        }
        days -= len;
        year += 1;
    }

    let february = if is_leap(year) { 29 } else { 28 };
    let months = [31, february, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut month = 1;
    for len in months {
        if days < len {
            break;
        }
        days -= len;
        month += 1;
    }
    (year, month, days + 1)
}
