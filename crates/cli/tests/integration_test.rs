//! Integration tests for the rvc CLI

use anyhow::Result;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run rvc in `dir` with config lookups confined to `home`
fn run_rvc(home: &Path, dir: &Path, args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_rvc"))
        .args(args)
        .current_dir(dir)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("USER", "tester")
        .env_remove("RVC_LOG")
        .output()?)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

struct Fixture {
    home: TempDir,
    work: TempDir,
}

impl Fixture {
    fn new() -> Result<Self> {
        let fixture = Self {
            home: TempDir::new()?,
            work: TempDir::new()?,
        };
        let output = fixture.rvc(&["init"])?;
        assert!(output.status.success(), "rvc init failed: {}", stderr(&output));
        Ok(fixture)
    }

    fn root(&self) -> &Path {
        self.work.path()
    }

    fn rvc(&self, args: &[&str]) -> Result<Output> {
        run_rvc(self.home.path(), self.work.path(), args)
    }
}

#[test]
fn test_init_creates_rvc_directory() -> Result<()> {
    let fixture = Fixture::new()?;
    let root = fixture.root();

    assert!(root.join(".rvc").is_dir());
    assert!(root.join(".rvc/commits").is_dir());
    assert!(root.join(".rvc/blobs").is_dir());
    assert!(root.join(".rvc/branches.db").exists());

    // A second init refuses to clobber it
    let output = fixture.rvc(&["init"])?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn test_status_on_clean_and_dirty_tree() -> Result<()> {
    let fixture = Fixture::new()?;

    let output = fixture.rvc(&["status"])?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("master"));
    assert!(stdout(&output).contains("working tree clean"));

    fs::write(fixture.root().join("a.txt"), "hi")?;
    let output = fixture.rvc(&["status"])?;
    assert!(stdout(&output).contains("a.txt"));
    Ok(())
}

#[test]
fn test_commit_and_log() -> Result<()> {
    let fixture = Fixture::new()?;
    fs::write(fixture.root().join("a.txt"), "hi")?;

    let output = fixture.rvc(&["commit", "-m", "init", "--author", "bob", "a.txt"])?;
    assert!(output.status.success(), "commit failed: {}", stderr(&output));

    let output = fixture.rvc(&["log"])?;
    assert!(output.status.success());
    let log = stdout(&output);
    assert!(log.contains("Author: bob"));
    assert!(log.contains("init"));

    // Committing again has nothing to record
    let output = fixture.rvc(&["commit", "-m", "again", "a.txt"])?;
    assert!(!output.status.success());
    assert!(stderr(&output).contains("nothing to commit"));
    Ok(())
}

#[test]
fn test_commit_author_defaults_to_user() -> Result<()> {
    let fixture = Fixture::new()?;
    fs::write(fixture.root().join("a.txt"), "hi")?;

    fixture.rvc(&["commit", "-m", "init", "a.txt"])?;
    let output = fixture.rvc(&["log"])?;
    assert!(stdout(&output).contains("Author: tester"));
    Ok(())
}

#[test]
fn test_commit_without_message_fails() -> Result<()> {
    let fixture = Fixture::new()?;
    fs::write(fixture.root().join("a.txt"), "hi")?;

    let output = fixture.rvc(&["commit", "a.txt"])?;
    assert!(!output.status.success());
    assert!(stderr(&output).contains("empty"));
    Ok(())
}

#[test]
fn test_configured_message_and_author() -> Result<()> {
    let fixture = Fixture::new()?;
    // both the XDG and the macOS lookups resolve here
    let config_dir = fixture.home.path().join(".config/rvc");
    fs::create_dir_all(&config_dir)?;
    fs::write(
        config_dir.join("config.toml"),
        "[user]\nname = \"carol\"\n\n[commit]\ndefault_message = \"wip\"\n",
    )?;
    fs::write(fixture.root().join("a.txt"), "hi")?;

    let output = fixture.rvc(&["commit", "a.txt"])?;
    assert!(output.status.success(), "commit failed: {}", stderr(&output));

    let log = stdout(&fixture.rvc(&["log"])?);
    assert!(log.contains("Author: carol"));
    assert!(log.contains("wip"));
    Ok(())
}

#[test]
fn test_branch_checkout_and_refusal() -> Result<()> {
    let fixture = Fixture::new()?;
    let a = fixture.root().join("a.txt");
    fs::write(&a, "hi")?;
    fixture.rvc(&["commit", "-m", "init", "a.txt"])?;

    let output = fixture.rvc(&["branch", "dev"])?;
    assert!(output.status.success(), "branch failed: {}", stderr(&output));

    let output = fixture.rvc(&["branch"])?;
    let listing = stdout(&output);
    assert!(listing.contains("dev"));
    assert!(listing.contains("master"));

    let output = fixture.rvc(&["checkout", "dev"])?;
    assert!(output.status.success(), "checkout failed: {}", stderr(&output));

    fs::write(&a, "bye")?;
    let output = fixture.rvc(&["checkout", "master"])?;
    assert!(!output.status.success());
    assert!(stderr(&output).contains("a.txt"));
    assert_eq!(fs::read_to_string(&a)?, "bye");

    let output = fixture.rvc(&["status"])?;
    assert!(stdout(&output).contains("dev"));
    Ok(())
}

#[test]
fn test_invalid_branch_name_rejected() -> Result<()> {
    let fixture = Fixture::new()?;
    let output = fixture.rvc(&["branch", "Not-Valid"])?;
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid"));
    Ok(())
}

#[test]
fn test_reset_discards_changes() -> Result<()> {
    let fixture = Fixture::new()?;
    let a = fixture.root().join("a.txt");
    fs::write(&a, "hi")?;
    fixture.rvc(&["commit", "-m", "init", "a.txt"])?;

    fs::write(&a, "scribble")?;
    fs::write(fixture.root().join("junk.txt"), "junk")?;
    let output = fixture.rvc(&["reset"])?;
    assert!(output.status.success(), "reset failed: {}", stderr(&output));

    assert_eq!(fs::read_to_string(&a)?, "hi");
    assert!(!fixture.root().join("junk.txt").exists());
    Ok(())
}

#[test]
fn test_commands_from_subdirectory() -> Result<()> {
    let fixture = Fixture::new()?;
    let sub = fixture.root().join("src/deep");
    fs::create_dir_all(&sub)?;
    fs::write(sub.join("main.c"), "int main;")?;

    let output = run_rvc(fixture.home.path(), &sub, &["commit", "-m", "add main", "main.c"])?;
    assert!(output.status.success(), "commit failed: {}", stderr(&output));

    let output = fixture.rvc(&["status"])?;
    assert!(stdout(&output).contains("working tree clean"));
    Ok(())
}

#[test]
fn test_clone() -> Result<()> {
    let fixture = Fixture::new()?;
    fs::write(fixture.root().join("a.txt"), "hi")?;
    fixture.rvc(&["commit", "-m", "init", "a.txt"])?;

    let dest = TempDir::new()?;
    let dst = dest.path().join("copy");
    let output = run_rvc(
        fixture.home.path(),
        dest.path(),
        &["clone", &fixture.root().to_string_lossy(), "copy"],
    )?;
    assert!(output.status.success(), "clone failed: {}", stderr(&output));
    assert_eq!(fs::read_to_string(dst.join("a.txt"))?, "hi");

    let output = run_rvc(fixture.home.path(), &dst, &["log"])?;
    assert!(stdout(&output).contains("init"));
    Ok(())
}

#[test]
fn test_outside_repository_fails() -> Result<()> {
    let home = TempDir::new()?;
    let dir = TempDir::new()?;
    let output = run_rvc(home.path(), dir.path(), &["status"])?;
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Not an rvc repository"));
    Ok(())
}
