use crate::analyze::analyzer::{has_all_labels, in_window, Aggregator, CommentCounter};
use crate::analyze::{CommentCounts, RankingQuery, Rankings};
use crate::github::{GithubPullRequester, PullRequestHead, PullRequestState};
use crate::model::{Repository, Result};
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use tracing::info;

async fn list_pull_requests<G: GithubPullRequester>(
    github: &G,
    repo: &Repository,
    state: PullRequestState,
    pages_pb: &ProgressBar,
) -> Result<Vec<PullRequestHead>> {
    let progress_pb = pages_pb.clone();
    let progress = move |page: u32| {
        progress_pb.set_message(format!("Fetch pull requests (#{page} page) ..."));
    };
    let heads = github
        .pull_request_heads(repo, state, Box::new(progress))
        .await?;
    pages_pb.finish_with_message(format!(
        "✅ Completed fetch pull requests (find {} pull requests)",
        heads.len()
    ));
    Ok(heads)
}

/// Reviewer and creator rankings for the pull requests of `repo` that pass
/// the query's time and label filters.
///
/// The progress bars only observe; pass [`ProgressBar::hidden`] to run quietly.
pub async fn collect_rankings<G: GithubPullRequester>(
    github: &G,
    repo: &Repository,
    state: PullRequestState,
    query: &RankingQuery,
    now: DateTime<Utc>,
    pages_pb: &ProgressBar,
    pulls_pb: &ProgressBar,
) -> Result<Rankings> {
    let heads = list_pull_requests(github, repo, state, pages_pb).await?;
    let total = heads.len();
    let heads = heads
        .into_iter()
        .filter(|head| in_window(head, query.window, now))
        .filter(|head| has_all_labels(head, &query.labels))
        .collect::<Vec<_>>();
    info!(
        repo = %repo,
        listed = total,
        matched = heads.len(),
        "Filtered pull requests"
    );

    pulls_pb.set_length(heads.len() as u64);
    let mut aggregator = Aggregator::new(query.method);
    for head in heads {
        let pull_request = github.pull_request(repo, head).await?;
        aggregator.process(&pull_request);
        pulls_pb.inc(1);
    }
    pulls_pb.finish();

    let rankings = aggregator.finish();
    info!(
        reviewers = rankings.reviewers.len(),
        creators = rankings.creators.len(),
        "Aggregated rankings"
    );
    Ok(rankings)
}

/// Review comments per user across every pull request of `repo` in `state`.
pub async fn collect_comment_counts<G: GithubPullRequester>(
    github: &G,
    repo: &Repository,
    state: PullRequestState,
    pages_pb: &ProgressBar,
    pulls_pb: &ProgressBar,
) -> Result<CommentCounts> {
    let heads = list_pull_requests(github, repo, state, pages_pb).await?;

    pulls_pb.set_length(heads.len() as u64);
    let mut counter = CommentCounter::new();
    for head in &heads {
        let comments = github.review_comments(repo, head.number).await?;
        counter.process(&comments);
        pulls_pb.inc(1);
    }
    pulls_pb.finish();

    Ok(counter.finish())
}
