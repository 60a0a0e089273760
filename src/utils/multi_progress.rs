use crate::utils::ProgressStyleTemplate;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub trait MultiProgressNew {
    fn add_with_style(&self, pb: ProgressBar, style: ProgressStyle) -> ProgressBar;
}

impl MultiProgressNew for MultiProgress {
    /// Attach `pb` below the existing bars and keep its spinner ticking
    /// while requests are in flight.
    fn add_with_style(&self, pb: ProgressBar, style: ProgressStyle) -> ProgressBar {
        let pb = self.add(pb.with_style(style));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Spinner for listing pages and a counting bar for per-pull-request work.
pub fn fetch_progress(multi_progress: &MultiProgress) -> (ProgressBar, ProgressBar) {
    let pages_pb = multi_progress.add_with_style(
        ProgressBar::new_spinner(),
        ProgressStyleTemplate::only_message(),
    );
    pages_pb.set_message("Waiting GitHub");
    let pulls_pb =
        multi_progress.add_with_style(ProgressBar::new(0), ProgressStyleTemplate::count_bar());
    pulls_pb.set_message("Processing Pull Requests");
    (pages_pb, pulls_pb)
}
