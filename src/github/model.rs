//! Wire types for the subset of the GitHub REST API this tool reads.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubTeam {
    pub slug: String,
}

/// Entry of `GET /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubPullSummary {
    pub number: u64,
    pub user: Option<GithubUser>,
    pub created_at: DateTime<Utc>,
    pub state: String,
    #[serde(default)]
    pub labels: Vec<GithubLabel>,
}

/// Fields of `GET /repos/{owner}/{repo}/pulls/{number}` that the listing omits.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubPullDetail {
    pub additions: u64,
    pub deletions: u64,
    #[serde(default)]
    pub requested_reviewers: Vec<GithubUser>,
    #[serde(default)]
    pub requested_teams: Vec<GithubTeam>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubReview {
    pub user: Option<GithubUser>,
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubReviewComment {
    pub user: Option<GithubUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubRepository {
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubErrorBody {
    pub message: String,
}
