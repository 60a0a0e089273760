use crate::model::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_PER_PAGE: u8 = 100;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings shared by every subcommand. Built once in `main` and handed
/// down by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub token: String,
    pub api_url: String,
    pub per_page: u8,
}

impl Config {
    pub fn new(token: Option<String>, api_url: impl ToString) -> Result<Self> {
        let token = token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(Error::MissingToken)?;
        Ok(Self {
            token,
            api_url: api_url.to_string().trim_end_matches('/').to_string(),
            per_page: DEFAULT_PER_PAGE,
        })
    }
}
