//! Conversions between working-tree paths and repository-relative paths
//!
//! Repository-relative paths are `/`-separated, with no leading separator and
//! no empty or `.` segments. This is the form stored in commit records and
//! listed in the ignore file.

use crate::error::{Result, ValidationError};
use std::path::{Component, Path, PathBuf};

/// Normalize a stored or user-supplied relative path
///
/// Collapses duplicate separators, drops `.` segments and any leading
/// separator (older objects were written with one).
pub fn normalize(path: &str) -> String {
    path.split(|c| c == '/' || c == std::path::MAIN_SEPARATOR)
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolve `path` against `root` without touching the filesystem
///
/// Relative paths are taken relative to `root`; `.` and `..` are folded
/// lexically so deleted files can still be named.
pub fn absolutize(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Convert an absolute path under `root` into its repository-relative form
///
/// Fails for paths a commit record cannot hold verbatim: non-UTF-8 names
/// and names containing a line break.
pub fn to_repo_path(root: &Path, abs: &Path) -> Result<String> {
    let rel = abs
        .strip_prefix(root)
        .map_err(|_| ValidationError::OutsideRepository(abs.to_path_buf()))?;

    let mut segments = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(seg) => {
                let seg = seg
                    .to_str()
                    .filter(|s| !s.contains(['\n', '\r']))
                    .ok_or_else(|| ValidationError::UntrackablePath(abs.to_path_buf()))?;
                segments.push(seg.to_string());
            }
            Component::CurDir => {}
            _ => return Err(ValidationError::OutsideRepository(abs.to_path_buf()).into()),
        }
    }
    Ok(segments.join("/"))
}

/// Convert a repository-relative path into an absolute path under `root`
pub fn to_abs_path(root: &Path, repo_path: &str) -> PathBuf {
    let mut abs = root.to_path_buf();
    for seg in repo_path.split('/').filter(|s| !s.is_empty() && *s != "." && *s != "..") {
        abs.push(seg);
    }
    abs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("a.txt"), "a.txt");
        assert_eq!(normalize("/a.txt"), "a.txt");
        assert_eq!(normalize("dir//sub///f"), "dir/sub/f");
        assert_eq!(normalize("./dir/./f"), "dir/f");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_absolutize() {
        let root = Path::new("/tmp/r");
        assert_eq!(absolutize(root, Path::new("a.txt")), PathBuf::from("/tmp/r/a.txt"));
        assert_eq!(absolutize(root, Path::new("d/../b.txt")), PathBuf::from("/tmp/r/b.txt"));
        assert_eq!(absolutize(root, Path::new("/other/x")), PathBuf::from("/other/x"));
    }

    #[test]
    fn test_repo_path_roundtrip() -> anyhow::Result<()> {
        let root = Path::new("/tmp/r");
        let abs = Path::new("/tmp/r/src/main.c");
        let rel = to_repo_path(root, abs)?;
        assert_eq!(rel, "src/main.c");
        assert_eq!(to_abs_path(root, &rel), abs);
        Ok(())
    }

    #[test]
    fn test_outside_repository() {
        let root = Path::new("/tmp/r");
        assert!(to_repo_path(root, Path::new("/tmp/other/a")).is_err());
        assert!(to_repo_path(root, Path::new("/tmp/rr/a")).is_err());
    }

    #[test]
    fn test_line_breaks_are_untrackable() {
        let root = Path::new("/tmp/r");
        for name in ["evil\nname", "cr\rname", "dir\n/f"] {
            let err = to_repo_path(root, &root.join(name)).unwrap_err();
            assert!(matches!(
                err,
                crate::Error::Validation(ValidationError::UntrackablePath(_))
            ));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_is_untrackable() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = Path::new("/tmp/r");
        let abs = root.join(OsStr::from_bytes(b"bad\xFFname"));
        let err = to_repo_path(root, &abs).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Validation(ValidationError::UntrackablePath(_))
        ));
    }

    #[test]
    fn test_abs_path_never_escapes_root() {
        let root = Path::new("/tmp/r");
        assert_eq!(to_abs_path(root, "../../etc/passwd"), PathBuf::from("/tmp/r/etc/passwd"));
    }
}
