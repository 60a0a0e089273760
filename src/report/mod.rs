pub mod markdown;
pub mod terminal;

pub use markdown::MarkdownReport;
pub use terminal::{write_list_item, TerminalReport};
