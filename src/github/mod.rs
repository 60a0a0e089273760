pub mod client;
pub mod model;
pub mod pull_request;

pub use client::GithubClient;
pub use pull_request::{
    Comment, GithubPullRequester, PageProgress, PullRequest, PullRequestHead, PullRequestState,
    Review, ReviewRequest, ReviewState,
};
