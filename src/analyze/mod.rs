pub mod analyzer;
pub mod collector;
mod model;

pub use collector::{collect_comment_counts, collect_rankings};
pub use model::{CommentCounts, Counter, RankingQuery, Rankings, TimeWindow, WeightMethod};
