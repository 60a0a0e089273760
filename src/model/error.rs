use crate::model::Repository;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a command. Each variant renders as a single
/// line, which is what the user sees before the process exits.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Please provide env variable `GITHUB_TOKEN`")]
    MissingToken,

    #[error("Bad credentials, check the value of `GITHUB_TOKEN`")]
    Unauthorized,

    #[error("Repository not found! (`{name}`)")]
    RepositoryNotFound { name: String },

    #[error("Invalid repository name `{0}`, expected `owner/name`")]
    InvalidRepositoryName(String),

    #[error("Check your internet connection! ({0})")]
    Connectivity(#[source] reqwest::Error),

    #[error("HTTP client error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("GitHub API rate limit exceeded, resets at {resets_at}")]
    RateLimited { resets_at: String },

    #[error("GitHub API error {status} on `{endpoint}`: {message}")]
    Api {
        status: u16,
        endpoint: String,
        message: String,
    },

    #[error("Unexpected response from `{endpoint}`: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to render report: {0}")]
    Report(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Only failures to reach the API are connectivity problems. Malformed
/// URLs and unreadable bodies are reported as they are.
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            Error::Connectivity(err)
        } else {
            Error::Http(err)
        }
    }
}

impl Error {
    /// A 404 on a repository-scoped endpoint means the repository itself is
    /// missing or hidden from the token.
    pub fn for_repository(self, repo: &Repository) -> Self {
        match self {
            Error::Api { status: 404, .. } => Error::RepositoryNotFound {
                name: repo.full_name(),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16) -> Error {
        Error::Api {
            status,
            endpoint: "/repos/octo/cat/pulls".to_string(),
            message: "Not Found".to_string(),
        }
    }

    #[test]
    fn not_found_becomes_repository_not_found() {
        let repo: Repository = "octo/cat".parse().unwrap();
        let err = api_error(404).for_repository(&repo);
        assert!(matches!(err, Error::RepositoryNotFound { ref name } if name == "octo/cat"));
        assert_eq!(err.to_string(), "Repository not found! (`octo/cat`)");
    }

    #[test]
    fn other_statuses_pass_through() {
        let repo: Repository = "octo/cat".parse().unwrap();
        let err = api_error(500).for_repository(&repo);
        assert!(matches!(err, Error::Api { status: 500, .. }));
    }

    #[test]
    fn messages_are_single_line() {
        let errors = [
            Error::MissingToken,
            Error::Unauthorized,
            Error::InvalidRepositoryName("nope".to_string()),
            api_error(502),
        ];
        for err in errors {
            assert!(!err.to_string().contains('\n'), "{err}");
        }
    }
}
