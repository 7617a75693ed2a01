//! Repository-local ignore list (`.rvc_ignore`)

use crate::path;
use std::path::Path;

/// Ignore file name, at the repository root
pub const IGNORE_FILE: &str = ".rvc_ignore";

/// Ordered list of ignored repository-relative paths
///
/// An entry matches the path itself and, when it names a directory,
/// everything beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    entries: Vec<String>,
}

impl IgnoreList {
    /// Load the ignore file from a repository root
    ///
    /// A missing or unreadable file means nothing is ignored.
    pub fn load(repo_root: &Path) -> Self {
        let ignore_path = repo_root.join(IGNORE_FILE);
        match std::fs::read_to_string(&ignore_path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable {}: {}", ignore_path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse ignore-file content: one path per line, blank lines and `#` comments skipped
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(path::normalize)
            .filter(|p| !p.is_empty())
            .collect();
        Self { entries }
    }

    /// Whether a repository-relative path is ignored
    pub fn is_ignored(&self, repo_path: &str) -> bool {
        let repo_path = path::normalize(repo_path);
        self.entries.iter().any(|entry| {
            repo_path == *entry
                || (repo_path.starts_with(entry.as_str())
                    && repo_path.as_bytes().get(entry.len()) == Some(&b'/'))
        })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_ignores_nothing() {
        let dir = TempDir::new().unwrap();
        let ignore = IgnoreList::load(dir.path());
        assert!(ignore.is_empty());
        assert!(!ignore.is_ignored("a.txt"));
    }

    #[test]
    fn test_exact_match() {
        let ignore = IgnoreList::parse("secret.txt\nbuild/out.o\n");
        assert!(ignore.is_ignored("secret.txt"));
        assert!(ignore.is_ignored("build/out.o"));
        assert!(!ignore.is_ignored("secret.txt.bak"));
        assert!(!ignore.is_ignored("other/secret.txt"));
    }

    #[test]
    fn test_directory_entry_covers_children() {
        let ignore = IgnoreList::parse("target");
        assert!(ignore.is_ignored("target"));
        assert!(ignore.is_ignored("target/debug/rvc"));
        assert!(!ignore.is_ignored("targets/x"));
    }

    #[test]
    fn test_normalizes_entries() {
        let ignore = IgnoreList::parse("/logs//today.log\r\n./tmp\n\n# comment\n");
        assert_eq!(ignore.entries(), &["logs/today.log".to_string(), "tmp".to_string()]);
        assert!(ignore.is_ignored("logs/today.log"));
        assert!(ignore.is_ignored("/tmp/x"));
    }

    #[test]
    fn test_load_from_repo_root() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join(IGNORE_FILE), "notes.txt\n")?;
        let ignore = IgnoreList::load(dir.path());
        assert!(ignore.is_ignored("notes.txt"));
        Ok(())
    }
}
