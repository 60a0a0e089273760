use crate::analyze::{CommentCounts, Counter, Rankings};
use crate::model::{Error, Result};
use crate::report::terminal::bar;
use markdown_builder::Markdown;
use markdown_table::{Heading, HeadingAlignment, MarkdownTable};
use std::fs;
use std::path::Path;
use tracing::info;

pub trait MarkdownReport {
    fn report_markdown(&self, title: &str) -> Result<String>;

    fn report_create(&self, path: &Path, title: &str) -> Result<()> {
        fs::write(path, self.report_markdown(title)?)?;
        info!("Report saved to {}", path.display());
        Ok(())
    }
}

impl MarkdownReport for Rankings {
    fn report_markdown(&self, title: &str) -> Result<String> {
        let mut doc = Markdown::new();
        doc.header1(title);
        doc.add_ranking("Reviewers ranking", &self.reviewers)?;
        doc.add_ranking("Creators ranking", &self.creators)?;
        Ok(doc.render())
    }
}

impl MarkdownReport for CommentCounts {
    fn report_markdown(&self, title: &str) -> Result<String> {
        let mut doc = Markdown::new();
        doc.header1(title);
        doc.header2("Comment count per user");
        let rows = self
            .rows
            .iter()
            .map(|(user, count)| vec![format!("**{user}**"), count.to_string()])
            .collect::<Vec<_>>();
        doc.add_table(&["User", "Comments"], rows)?;
        Ok(doc.render())
    }
}

trait MarkdownExt {
    fn add_ranking(&mut self, headline: &str, counter: &Counter) -> Result<()>;
    fn add_table(&mut self, headings: &[&str], rows: Vec<Vec<String>>) -> Result<()>;
}

impl MarkdownExt for Markdown {
    fn add_ranking(&mut self, headline: &str, counter: &Counter) -> Result<()> {
        self.header2(headline);
        let total = counter.total();
        let rows = counter
            .ranked()
            .into_iter()
            .map(|(user, value)| {
                let (_, percent) = bar(value, total);
                vec![
                    format!("**{user}**"),
                    value.to_string(),
                    format!("{percent:.1}%"),
                ]
            })
            .collect::<Vec<_>>();
        self.add_table(&["User", "Weight", "Share"], rows)
    }

    fn add_table(&mut self, headings: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if rows.is_empty() {
            self.paragraph("_Nothing to report._");
            return Ok(());
        }
        let header = headings
            .iter()
            .enumerate()
            .map(|(index, heading)| {
                let alignment = (index > 0).then_some(HeadingAlignment::Center);
                Heading::new(heading.to_string(), alignment)
            })
            .collect::<Vec<_>>();
        let mut table = MarkdownTable::new(rows);
        table.with_headings(header);
        let rendered = table
            .as_markdown()
            .map_err(|err| Error::Report(format!("{err:?}")))?;
        self.paragraph(rendered);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;

    #[test]
    fn rankings_export_to_file() {
        let reviewers: Counter = [(User::new("alice"), 3), (User::new("bob"), 1)]
            .into_iter()
            .collect();
        let rankings = Rankings {
            reviewers,
            creators: Counter::new(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");

        rankings.report_create(&path, "Review statistics for octo/cat").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Review statistics for octo/cat"));
        assert!(content.contains("Reviewers ranking"));
        assert!(content.contains("alice"));
        assert!(content.contains("75.0%"));
        assert!(content.contains("Nothing to report"));
        assert!(content.find("alice").unwrap() < content.find("bob").unwrap());
    }

    #[test]
    fn comment_counts_export() {
        let counts = CommentCounts {
            rows: vec![(User::new("carol"), 4)],
        };
        let content = counts.report_markdown("Comments").unwrap();
        assert!(content.contains("Comment count per user"));
        assert!(content.contains("carol"));
        assert!(content.contains('4'));
    }
}
