mod multi_progress;
mod progress_style;

pub use multi_progress::fetch_progress;
pub use progress_style::ProgressStyleTemplate;
