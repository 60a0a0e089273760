use crate::analyze::{CommentCounts, Counter, Rankings};
use colored::Colorize;
use std::io::{self, Write};

const BAR_LENGTH: usize = 44;
const LABEL_WIDTH: usize = 25;
const COMMENT_LABEL_WIDTH: usize = 20;

pub trait TerminalReport {
    fn write_terminal<W: Write>(&self, out: &mut W) -> io::Result<()>;
}

impl TerminalReport for Rankings {
    fn write_terminal<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_ranking(out, &self.reviewers, "Reviewers ranking:")?;
        write_ranking(out, &self.creators, "Creators ranking:")
    }
}

impl TerminalReport for CommentCounts {
    fn write_terminal<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Comment count per user:")?;
        for (user, count) in &self.rows {
            let label = format!("{user}:");
            writeln!(out, "{label:<COMMENT_LABEL_WIDTH$}{count}")?;
        }
        Ok(())
    }
}

/// One line per user, largest share first.
pub fn write_ranking<W: Write>(out: &mut W, counter: &Counter, headline: &str) -> io::Result<()> {
    let total = counter.total();
    writeln!(out)?;
    writeln!(out, "{headline}")?;
    for (user, value) in counter.ranked() {
        let (bar, percent) = bar(value, total);
        let label = format!("{:<LABEL_WIDTH$}", user.login);
        writeln!(out, "{} [{bar}] {percent:>7.1}% ({value})", label.green())?;
    }
    Ok(())
}

/// Item of a plain listing (labels, repositories).
pub fn write_list_item<W: Write>(out: &mut W, item: &str) -> io::Result<()> {
    writeln!(out, " ✥ {}", item.green())
}

/// Filled bar and percentage of `value` against `total`, the percentage
/// rounded to one decimal with ties to even. A zero total renders an empty
/// bar at 0%.
pub fn bar(value: u64, total: u64) -> (String, f64) {
    if total == 0 {
        return ("-".repeat(BAR_LENGTH), 0.0);
    }
    let percent = 100.0 * (value as f64 / total as f64);
    let percent = (percent * 10.0).round_ties_even() / 10.0;
    let filled = ((BAR_LENGTH as u128 * value as u128) / total as u128) as usize;
    let filled = filled.min(BAR_LENGTH);
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_LENGTH - filled));
    (bar, percent)
}
