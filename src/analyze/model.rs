use crate::model::User;
use chrono::Duration;
use clap::ValueEnum;
use indexmap::IndexMap;
use itertools::Itertools;
use std::collections::BTreeSet;

/// How much a single pull request counts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WeightMethod {
    /// Every pull request counts as 1.
    Simple,
    /// Lines added plus lines deleted.
    Changes,
}

/// Age limit applied to pull requests, relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeWindow {
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    pub fn max_age(&self) -> Option<Duration> {
        match self {
            TimeWindow::Week => Some(Duration::days(7)),
            TimeWindow::Month => Some(Duration::days(31)),
            TimeWindow::Year => Some(Duration::days(365)),
            TimeWindow::All => None,
        }
    }
}

/// Per-user running totals. Values only ever grow; iteration order is the
/// order in which users were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counter {
    values: IndexMap<User, u64>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, user: User, value: u64) {
        *self.values.entry(user).or_insert(0) += value;
    }

    /// Key-wise increment by every entry of `other`.
    pub fn update(&mut self, other: impl IntoIterator<Item = (User, u64)>) {
        for (user, value) in other {
            self.add(user, value);
        }
    }

    pub fn get(&self, user: &User) -> Option<u64> {
        self.values.get(user).copied()
    }

    pub fn total(&self) -> u64 {
        self.values.values().sum()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries by descending value. Ties keep first-seen order.
    pub fn ranked(&self) -> Vec<(&User, u64)> {
        self.values
            .iter()
            .map(|(user, value)| (user, *value))
            .sorted_by(|(_, a), (_, b)| b.cmp(a))
            .collect()
    }
}

impl FromIterator<(User, u64)> for Counter {
    fn from_iter<I: IntoIterator<Item = (User, u64)>>(iter: I) -> Self {
        let mut counter = Counter::new();
        counter.update(iter);
        counter
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rankings {
    pub reviewers: Counter,
    pub creators: Counter,
}

/// Review comments per user, most active first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentCounts {
    pub rows: Vec<(User, u64)>,
}

/// Filters and weighting for one `show` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingQuery {
    pub method: WeightMethod,
    pub window: TimeWindow,
    pub labels: BTreeSet<String>,
}

impl RankingQuery {
    pub fn new(method: WeightMethod, window: TimeWindow, labels: impl IntoIterator<Item = String>) -> Self {
        Self {
            method,
            window,
            labels: labels.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_accumulates_by_login() {
        let mut counter = Counter::new();
        counter.add(User::new("a"), 3);
        counter.add(User::new("b"), 0);
        counter.add(User::new("a"), 4);
        assert_eq!(counter.get(&User::new("a")), Some(7));
        assert_eq!(counter.get(&User::new("b")), Some(0));
        assert_eq!(counter.len(), 2);
        assert_eq!(counter.total(), 7);
    }

    #[test]
    fn ranked_is_descending_and_stable_on_ties() {
        let counter: Counter = [
            (User::new("first"), 2),
            (User::new("big"), 9),
            (User::new("second"), 2),
        ]
        .into_iter()
        .collect();
        let logins = counter
            .ranked()
            .into_iter()
            .map(|(user, value)| (user.login.as_str(), value))
            .collect::<Vec<_>>();
        assert_eq!(logins, vec![("big", 9), ("first", 2), ("second", 2)]);
    }

    #[test]
    fn window_ages() {
        assert_eq!(TimeWindow::Week.max_age(), Some(Duration::days(7)));
        assert_eq!(TimeWindow::Month.max_age(), Some(Duration::days(31)));
        assert_eq!(TimeWindow::Year.max_age(), Some(Duration::days(365)));
        assert_eq!(TimeWindow::All.max_age(), None);
    }

    #[test]
    fn unknown_window_is_rejected_when_parsing() {
        assert_eq!(TimeWindow::from_str("week", false), Ok(TimeWindow::Week));
        assert!(TimeWindow::from_str("fortnight", false).is_err());
        assert!(WeightMethod::from_str("lines", false).is_err());
    }
}
