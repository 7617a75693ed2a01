//! Branch names and their association-store keys

use rvc_core::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Key prefix distinguishing branch heads from commit digests
pub const BRANCH_PREFIX: &str = "branches.";

/// Branch created by `init`
pub const DEFAULT_BRANCH: &str = "master";

/// Branch names must be shorter than this many characters
pub const MAX_BRANCH_NAME_LEN: usize = 16;

/// A validated branch name: 1-15 characters of `[a-z0-9_]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let valid = !name.is_empty()
            && name.chars().count() < MAX_BRANCH_NAME_LEN
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

        if valid {
            Ok(Self(name.to_string()))
        } else {
            Err(ValidationError::InvalidBranchName(name.to_string()))
        }
    }

    /// The default branch
    pub fn master() -> Self {
        Self(DEFAULT_BRANCH.to_string())
    }

    /// Recover a branch name from its store key
    pub fn from_key(key: &str) -> Result<Self, ValidationError> {
        let name = key
            .strip_prefix(BRANCH_PREFIX)
            .ok_or_else(|| ValidationError::InvalidBranchName(key.to_string()))?;
        Self::new(name)
    }

    /// The association-store key holding this branch's head
    pub fn key(&self) -> String {
        format!("{}{}", BRANCH_PREFIX, self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BranchName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["master", "dev", "feature_2", "a", "abcdefghijklmno"] {
            assert!(BranchName::new(name).is_ok(), "{} should be valid", name);
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "Dev", "feature-x", "a b", "abcdefghijklmnop", "naïve", "x.y"] {
            assert_eq!(
                BranchName::new(name),
                Err(ValidationError::InvalidBranchName(name.to_string())),
                "{} should be invalid",
                name
            );
        }
    }

    #[test]
    fn test_key_roundtrip() {
        let name = BranchName::new("dev").unwrap();
        assert_eq!(name.key(), "branches.dev");
        assert_eq!(BranchName::from_key("branches.dev").unwrap(), name);
        assert!(BranchName::from_key("current_branch").is_err());
    }

    #[test]
    fn test_master() {
        assert_eq!(BranchName::master().key(), "branches.master");
    }
}
