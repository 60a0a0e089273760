use crate::github::model::{
    GithubPullDetail, GithubPullSummary, GithubReview, GithubReviewComment, GithubUser,
};
use crate::github::GithubClient;
use crate::model::{Repository, Result, User};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PullRequestState {
    Open,
    Closed,
    All,
}

impl PullRequestState {
    pub fn as_query(&self) -> &'static str {
        match self {
            PullRequestState::Open => "open",
            PullRequestState::Closed => "closed",
            PullRequestState::All => "all",
        }
    }

    fn from_wire(state: &str) -> Self {
        match state {
            "closed" => PullRequestState::Closed,
            _ => PullRequestState::Open,
        }
    }
}

/// What the pull-request listing tells us. Enough to apply the time and
/// label filters before paying for the detail and review requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestHead {
    pub number: u64,
    pub author: User,
    pub created_at: DateTime<Utc>,
    pub state: PullRequestState,
    pub labels: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    Unknown,
}

impl From<&str> for ReviewState {
    fn from(state: &str) -> Self {
        match state {
            "APPROVED" => ReviewState::Approved,
            "CHANGES_REQUESTED" => ReviewState::ChangesRequested,
            "COMMENTED" => ReviewState::Commented,
            "DISMISSED" => ReviewState::Dismissed,
            "PENDING" => ReviewState::Pending,
            _ => ReviewState::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub author: Option<User>,
    pub state: ReviewState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewRequest {
    User(User),
    Team(String),
}

impl ReviewRequest {
    pub fn user(&self) -> Option<&User> {
        match self {
            ReviewRequest::User(user) => Some(user),
            ReviewRequest::Team(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author: Option<User>,
    pub pull_request: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub head: PullRequestHead,
    pub additions: u64,
    pub deletions: u64,
    pub reviews: Vec<Review>,
    pub review_requests: Vec<ReviewRequest>,
}

impl PullRequest {
    fn new(head: PullRequestHead, detail: GithubPullDetail, reviews: Vec<GithubReview>) -> Self {
        let review_requests = detail
            .requested_reviewers
            .into_iter()
            .map(|user| ReviewRequest::User(user.into()))
            .chain(
                detail
                    .requested_teams
                    .into_iter()
                    .map(|team| ReviewRequest::Team(team.slug)),
            )
            .collect();
        let reviews = reviews
            .into_iter()
            .map(|review| Review {
                author: review.user.map(User::from),
                state: ReviewState::from(review.state.as_str()),
            })
            .collect();
        Self {
            head,
            additions: detail.additions,
            deletions: detail.deletions,
            reviews,
            review_requests,
        }
    }

    pub fn author(&self) -> &User {
        &self.head.author
    }
}

impl From<GithubUser> for User {
    fn from(user: GithubUser) -> Self {
        User::new(user.login)
    }
}

impl From<GithubPullSummary> for PullRequestHead {
    fn from(summary: GithubPullSummary) -> Self {
        Self {
            number: summary.number,
            author: summary.user.map(User::from).unwrap_or_else(User::ghost),
            created_at: summary.created_at,
            state: PullRequestState::from_wire(&summary.state),
            labels: summary.labels.into_iter().map(|label| label.name).collect(),
        }
    }
}

fn comment_from_wire(pull_request: u64, comment: GithubReviewComment) -> Comment {
    Comment {
        author: comment.user.map(User::from),
        pull_request,
    }
}

/// Called with the 1-based page number before each listing page is requested.
pub type PageProgress<'a> = Box<dyn FnMut(u32) + Send + 'a>;

pub trait GithubPullRequester {
    async fn pull_request_heads<'a>(
        &self,
        repo: &Repository,
        state: PullRequestState,
        cb: PageProgress<'a>,
    ) -> Result<Vec<PullRequestHead>>;

    async fn pull_request(&self, repo: &Repository, head: PullRequestHead) -> Result<PullRequest>;

    async fn review_comments(&self, repo: &Repository, number: u64) -> Result<Vec<Comment>>;
}

impl GithubPullRequester for GithubClient {
    async fn pull_request_heads<'a>(
        &self,
        repo: &Repository,
        state: PullRequestState,
        cb: PageProgress<'a>,
    ) -> Result<Vec<PullRequestHead>> {
        let summaries: Vec<GithubPullSummary> = self
            .get_all_pages(
                &format!("{}/pulls", repo.api_path()),
                &[("state", state.as_query())],
                cb,
            )
            .await
            .map_err(|err| err.for_repository(repo))?;
        debug!(repo = %repo, count = summaries.len(), "Listed pull requests");
        Ok(summaries.into_iter().map(PullRequestHead::from).collect())
    }

    async fn pull_request(&self, repo: &Repository, head: PullRequestHead) -> Result<PullRequest> {
        let pull_path = format!("{}/pulls/{}", repo.api_path(), head.number);
        let reviews_path = format!("{pull_path}/reviews");
        let (detail, reviews) = futures::join!(
            self.get::<GithubPullDetail>(&pull_path),
            self.get_all_pages::<GithubReview>(&reviews_path, &[], Box::new(|_: u32| {})),
        );
        let detail = detail.map_err(|err| err.for_repository(repo))?;
        let reviews = reviews.map_err(|err| err.for_repository(repo))?;
        debug!(
            number = head.number,
            state = ?head.state,
            reviews = reviews.len(),
            requested = detail.requested_reviewers.len(),
            "Fetched pull request"
        );
        Ok(PullRequest::new(head, detail, reviews))
    }

    async fn review_comments(&self, repo: &Repository, number: u64) -> Result<Vec<Comment>> {
        let comments: Vec<GithubReviewComment> = self
            .get_all_pages(
                &format!("{}/pulls/{number}/comments", repo.api_path()),
                &[],
                Box::new(|_: u32| {}),
            )
            .await
            .map_err(|err| err.for_repository(repo))?;
        Ok(comments
            .into_iter()
            .map(|comment| comment_from_wire(number, comment))
            .collect())
    }
}
