use crate::model::Error;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

// New
impl Repository {
    pub fn new(owner: impl ToString, name: impl ToString) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Path prefix of every repository-scoped endpoint.
    pub fn api_path(&self) -> String {
        format!("/repos/{}/{}", self.owner, self.name)
    }
}

// Parser
impl FromStr for Repository {
    type Err = Error;

    fn from_str(full_name: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidRepositoryName(full_name.to_string());
        let (owner, name) = full_name.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self::new(owner, name))
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_name() {
        let repo: Repository = "rust-lang/cargo".parse().unwrap();
        assert_eq!(repo, Repository::new("rust-lang", "cargo"));
        assert_eq!(repo.full_name(), "rust-lang/cargo");
        assert_eq!(repo.api_path(), "/repos/rust-lang/cargo");
    }

    #[test]
    fn rejects_malformed_names() {
        for name in ["cargo", "/cargo", "rust-lang/", "a/b/c", ""] {
            assert!(
                matches!(name.parse::<Repository>(), Err(Error::InvalidRepositoryName(_))),
                "{name}"
            );
        }
    }
}
