//! Tests for config command

use anyhow::Result;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn rvc_config(home: &TempDir) -> Result<std::process::Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_rvc"))
        .arg("config")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .output()?)
}

#[test]
fn test_config_defaults() -> Result<()> {
    let home = TempDir::new()?;
    let output = rvc_config(&home)?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[log]"));
    assert!(stdout.contains("limit = 20"));
    assert!(stdout.contains("not found"));
    Ok(())
}

#[test]
fn test_config_reads_file() -> Result<()> {
    let home = TempDir::new()?;
    let dir = home.path().join(".config/rvc");
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("config.toml"), "[log]\nlimit = 5\n")?;

    let output = rvc_config(&home)?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("limit = 5"));
    Ok(())
}

#[test]
fn test_config_rejects_malformed_file() -> Result<()> {
    let home = TempDir::new()?;
    let dir = home.path().join(".config/rvc");
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("config.toml"), "[log\nlimit = ")?;

    let output = rvc_config(&home)?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to parse config"));
    Ok(())
}
