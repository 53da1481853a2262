use anyhow::Result;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;
use crate::transcript_processor::Exchange;

// @module: Markdown serialization of exchanges

// @struct: Markdown emission utility
pub struct MarkdownWriter;

impl MarkdownWriter {
    /// Render one exchange as a Markdown document.
    ///
    /// The layout is fixed: a frontmatter block with an empty `categorie:`
    /// field and the run date, then a `# Question` heading with the question
    /// text and a `# Réponse` heading with the answer text. Content is passed
    /// through verbatim; Markdown-significant characters in the transcript
    /// are not escaped.
    pub fn render_exchange(exchange: &Exchange, date: NaiveDate) -> String {
        format!(
            "---\ncategorie:\ndate: {}\n---\n\n{}",
            date.format("%Y-%m-%d"),
            exchange
        )
    }

    /// File name for an exchange: `{YYYYMMDD}-{index:03}.md`, the index being
    /// the 1-based position of the exchange within its source transcript.
    pub fn exchange_filename(date: NaiveDate, index: usize) -> String {
        format!("{}-{:03}.md", date.format("%Y%m%d"), index)
    }

    /// Write one exchange into the given directory, creating it if needed.
    pub fn write_exchange(dir: &Path, exchange: &Exchange, date: NaiveDate) -> Result<PathBuf> {
        let path = dir.join(Self::exchange_filename(date, exchange.index));
        FileManager::write_to_file(&path, &Self::render_exchange(exchange, date))?;
        Ok(path)
    }
}
