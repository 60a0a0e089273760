use std::fmt;

/// A GitHub account. Identity is the login, so the same person seen on
/// different pull requests lands in the same bucket.
#[derive(Debug, Clone, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct User {
    pub login: String,
}

// Create
impl User {
    /// Login GitHub reports for deleted accounts.
    pub const GHOST: &'static str = "ghost";

    pub fn new(login: impl ToString) -> Self {
        Self {
            login: login.to_string(),
        }
    }

    pub fn ghost() -> Self {
        Self::new(Self::GHOST)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.login)
    }
}
