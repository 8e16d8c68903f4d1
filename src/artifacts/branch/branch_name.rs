use crate::artifacts::branch::{INVALID_BRANCH_NAME_REGEX, REF_PREFIX};
use crate::errors::{Result, StoreError};
use std::sync::LazyLock;

static INVALID_BRANCH_NAME: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(INVALID_BRANCH_NAME_REGEX).expect("branch name regex is valid")
});

/// A validated branch name such as `main` or `feature/login`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() || name == "HEAD" || INVALID_BRANCH_NAME.is_match(&name) {
            return Err(StoreError::InvalidBranchName(name));
        }

        Ok(Self(name))
    }

    /// Parse `refs/heads/<name>`
    pub fn try_parse_ref_path(ref_path: &str) -> Result<Self> {
        match ref_path.strip_prefix(REF_PREFIX) {
            Some(name) => Self::try_parse(name),
            None => Err(StoreError::InvalidBranchName(ref_path.to_string())),
        }
    }

    /// `refs/heads/<name>`, relative to the git directory
    pub fn ref_path(&self) -> String {
        format!("{REF_PREFIX}{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
