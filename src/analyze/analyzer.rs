use crate::analyze::{CommentCounts, Counter, Rankings, TimeWindow, WeightMethod};
use crate::github::{Comment, PullRequest, PullRequestHead, ReviewRequest, ReviewState};
use crate::model::User;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use itertools::Itertools;
use std::collections::BTreeSet;
use tracing::debug;

impl WeightMethod {
    pub fn weight(&self, pull_request: &PullRequest) -> u64 {
        match self {
            WeightMethod::Simple => 1,
            WeightMethod::Changes => pull_request.additions + pull_request.deletions,
        }
    }
}

impl TimeWindow {
    /// Strictly younger than the window: a timestamp exactly on the
    /// boundary is out.
    pub fn includes(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.max_age() {
            Some(max_age) => created_at > now - max_age,
            None => true,
        }
    }
}

pub fn in_window(head: &PullRequestHead, window: TimeWindow, now: DateTime<Utc>) -> bool {
    window.includes(head.created_at, now)
}

/// Every required label is present. No required labels means no filtering.
pub fn has_all_labels(head: &PullRequestHead, required: &BTreeSet<String>) -> bool {
    required.is_subset(&head.labels)
}

impl ReviewState {
    /// Approvals and change requests count as having reviewed; comments,
    /// dismissed and pending reviews do not.
    pub fn is_verdict(&self) -> bool {
        matches!(self, ReviewState::Approved | ReviewState::ChangesRequested)
    }
}

/// Everyone who reviewed or was asked to review, each credited once with
/// the pull request's weight.
pub fn reviewers(pull_request: &PullRequest, method: WeightMethod) -> IndexMap<User, u64> {
    let points = method.weight(pull_request);
    let verdicts = pull_request
        .reviews
        .iter()
        .filter(|review| review.state.is_verdict())
        .filter_map(|review| review.author.as_ref());
    let requested = pull_request
        .review_requests
        .iter()
        .filter_map(ReviewRequest::user);

    verdicts
        .chain(requested)
        .unique()
        .map(|user| (user.clone(), points))
        .collect()
}

/// Reviewer and creator totals over a stream of pull requests.
#[derive(Debug, Clone)]
pub struct Aggregator {
    method: WeightMethod,
    rankings: Rankings,
}

impl Aggregator {
    pub fn new(method: WeightMethod) -> Self {
        Self {
            method,
            rankings: Rankings::default(),
        }
    }

    pub fn process(&mut self, pull_request: &PullRequest) {
        let credited = reviewers(pull_request, self.method);
        let weight = self.method.weight(pull_request);
        debug!(
            number = pull_request.head.number,
            weight,
            reviewers = credited.len(),
            "Aggregating pull request"
        );
        self.rankings.reviewers.update(credited);
        self.rankings
            .creators
            .add(pull_request.author().clone(), weight);
    }

    pub fn finish(self) -> Rankings {
        self.rankings
    }
}

/// Plain (unweighted) review-comment count per author.
#[derive(Debug, Clone, Default)]
pub struct CommentCounter {
    counter: Counter,
}

impl CommentCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, comments: &[Comment]) {
        if let Some(first) = comments.first() {
            debug!(
                number = first.pull_request,
                comments = comments.len(),
                "Counting review comments"
            );
        }
        for author in comments.iter().filter_map(|comment| comment.author.clone()) {
            self.counter.add(author, 1);
        }
    }

    pub fn finish(self) -> CommentCounts {
        let rows = self
            .counter
            .ranked()
            .into_iter()
            .map(|(user, count)| (user.clone(), count))
            .collect();
        CommentCounts { rows }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::github::{PullRequestState, Review};
    use chrono::{Duration, TimeZone};

    pub(crate) fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    pub(crate) fn head(number: u64, author: &str) -> PullRequestHead {
        PullRequestHead {
            number,
            author: User::new(author),
            created_at: now() - Duration::days(1),
            state: PullRequestState::Open,
            labels: BTreeSet::new(),
        }
    }

    pub(crate) fn review(author: &str, state: ReviewState) -> Review {
        Review {
            author: Some(User::new(author)),
            state,
        }
    }

    pub(crate) fn pull_request(
        number: u64,
        author: &str,
        additions: u64,
        deletions: u64,
        reviews: Vec<Review>,
    ) -> PullRequest {
        PullRequest {
            head: head(number, author),
            additions,
            deletions,
            reviews,
            review_requests: vec![],
        }
    }

    /// PR1 by A approved by B (+10/-5), PR2 by B approved by A and with
    /// changes requested by C (+0/-0), PR3 by A without reviews.
    pub(crate) fn scenario() -> Vec<PullRequest> {
        vec![
            pull_request(1, "A", 10, 5, vec![review("B", ReviewState::Approved)]),
            pull_request(
                2,
                "B",
                0,
                0,
                vec![
                    review("A", ReviewState::Approved),
                    review("C", ReviewState::ChangesRequested),
                ],
            ),
            pull_request(3, "A", 0, 0, vec![]),
        ]
    }

    fn user(login: &str) -> User {
        User::new(login)
    }

    #[test]
    fn simple_weight_is_always_one() {
        for (additions, deletions) in [(0, 0), (10, 5), (10_000, 1)] {
            let pr = pull_request(1, "a", additions, deletions, vec![]);
            assert_eq!(WeightMethod::Simple.weight(&pr), 1);
        }
    }

    #[test]
    fn changes_weight_is_additions_plus_deletions() {
        assert_eq!(WeightMethod::Changes.weight(&pull_request(1, "a", 10, 5, vec![])), 15);
        assert_eq!(WeightMethod::Changes.weight(&pull_request(1, "a", 0, 0, vec![])), 0);
    }

    #[test]
    fn week_boundary_is_exclusive() {
        let mut pr = head(1, "a");
        pr.created_at = now() - Duration::days(7);
        assert!(!in_window(&pr, TimeWindow::Week, now()));

        pr.created_at = now() - Duration::days(6) - Duration::hours(23);
        assert!(in_window(&pr, TimeWindow::Week, now()));
    }

    #[test]
    fn month_year_and_all_windows() {
        let mut pr = head(1, "a");
        pr.created_at = now() - Duration::days(30);
        assert!(in_window(&pr, TimeWindow::Month, now()));
        assert!(!in_window(&pr, TimeWindow::Week, now()));

        pr.created_at = now() - Duration::days(31);
        assert!(!in_window(&pr, TimeWindow::Month, now()));
        assert!(in_window(&pr, TimeWindow::Year, now()));

        pr.created_at = now() - Duration::days(4000);
        assert!(!in_window(&pr, TimeWindow::Year, now()));
        assert!(in_window(&pr, TimeWindow::All, now()));
    }

    #[test]
    fn label_filter_requires_every_label() {
        let mut pr = head(1, "a");
        pr.labels = BTreeSet::from(["bug".to_string(), "urgent".to_string()]);

        let bug = BTreeSet::from(["bug".to_string()]);
        let bug_missing = BTreeSet::from(["bug".to_string(), "missing".to_string()]);
        assert!(has_all_labels(&pr, &bug));
        assert!(!has_all_labels(&pr, &bug_missing));
        assert!(has_all_labels(&pr, &BTreeSet::new()));
        assert!(has_all_labels(&head(2, "b"), &BTreeSet::new()));
    }

    #[test]
    fn reviewer_in_several_sources_is_credited_once() {
        let mut pr = pull_request(
            1,
            "author",
            3,
            4,
            vec![
                review("bob", ReviewState::Approved),
                review("bob", ReviewState::ChangesRequested),
                review("carol", ReviewState::Commented),
                review("dave", ReviewState::Dismissed),
            ],
        );
        pr.review_requests = vec![
            ReviewRequest::User(user("bob")),
            ReviewRequest::User(user("erin")),
            ReviewRequest::Team("core".to_string()),
        ];

        let credited = reviewers(&pr, WeightMethod::Changes);
        assert_eq!(
            credited.into_iter().collect::<Vec<_>>(),
            vec![(user("bob"), 7), (user("erin"), 7)]
        );
    }

    #[test]
    fn anonymous_reviews_are_ignored() {
        let pr = pull_request(
            1,
            "author",
            1,
            1,
            vec![Review {
                author: None,
                state: ReviewState::Approved,
            }],
        );
        assert!(reviewers(&pr, WeightMethod::Simple).is_empty());
    }

    #[test]
    fn end_to_end_scenario() {
        let mut aggregator = Aggregator::new(WeightMethod::Changes);
        for pr in scenario() {
            aggregator.process(&pr);
        }
        let rankings = aggregator.finish();

        assert_eq!(rankings.creators.get(&user("A")), Some(15));
        assert_eq!(rankings.creators.get(&user("B")), Some(0));
        assert_eq!(rankings.creators.len(), 2);

        assert_eq!(rankings.reviewers.get(&user("B")), Some(15));
        assert_eq!(rankings.reviewers.get(&user("A")), Some(0));
        assert_eq!(rankings.reviewers.get(&user("C")), Some(0));
        assert_eq!(rankings.reviewers.len(), 3);
    }

    #[test]
    fn independent_aggregators_agree() {
        let run = || {
            let mut aggregator = Aggregator::new(WeightMethod::Simple);
            scenario().iter().for_each(|pr| aggregator.process(pr));
            aggregator.finish()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn comment_counter_sorts_by_count() {
        let comment = |author: Option<&str>| Comment {
            author: author.map(User::new),
            pull_request: 1,
        };
        let mut counter = CommentCounter::new();
        counter.process(&[comment(Some("x")), comment(Some("y")), comment(None)]);
        counter.process(&[comment(Some("y")), comment(Some("z"))]);

        let counts = counter.finish();
        assert_eq!(
            counts.rows,
            vec![(user("y"), 2), (user("x"), 1), (user("z"), 1)]
        );
    }
}
