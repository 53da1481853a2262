use anyhow::{Context, Result};
use log::debug;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_config::SegmentationConfig;

// @module: Transcript segmentation

// @enum: Accumulation target while scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanMode {
    // Before the first question marker; lines are discarded
    Idle,
    Question,
    Answer,
}

// @struct: Single question/answer turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    // @field: 1-based position within the source transcript
    pub index: usize,

    // @field: The user's turn, trimmed
    pub question: String,

    // @field: The assistant's turn, trimmed
    pub answer: String,
}

impl Exchange {
    /// Creates a new exchange
    pub fn new(index: usize, question: String, answer: String) -> Self {
        Exchange {
            index,
            question,
            answer,
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "# Question")?;
        writeln!(f, "{}", self.question)?;
        writeln!(f)?;
        writeln!(f, "# Réponse")?;
        writeln!(f, "{}", self.answer)
    }
}

/// An ordered sequence of exchanges extracted from one transcript file
#[derive(Debug)]
pub struct Transcript {
    /// Source filename
    pub source_file: PathBuf,

    /// Exchanges in source order, numbered from 1
    pub exchanges: Vec<Exchange>,
}

impl Transcript {
    /// Read a transcript file (UTF-8) and segment it into exchanges.
    pub fn parse_file<P: AsRef<Path>>(path: P, markers: &SegmentationConfig) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript file: {:?}", path))?;

        let exchanges = Self::parse_transcript_string(&content, markers);
        debug!("{} exchange(s) found in {:?}", exchanges.len(), path);

        Ok(Transcript {
            source_file: path.to_path_buf(),
            exchanges,
        })
    }

    /// Segment raw transcript text into ordered exchanges.
    ///
    /// The scan keeps two accumulators, unset until the first question marker
    /// is seen. A line containing the question marker flushes any exchange in
    /// progress and opens a new one; a line containing the answer marker
    /// switches accumulation to the answer side; every other line is appended
    /// verbatim (with its line terminator) to whichever buffer the current
    /// mode designates. Marker lines themselves are never accumulated, and a
    /// transcript ending mid-answer still yields its trailing exchange.
    ///
    /// Marker detection is substring containment, not anchored matching: a
    /// marker appearing anywhere in a line, even inside quoted content,
    /// starts a turn. This mirrors how existing transcript collections were
    /// split, so splitting the same export twice stays reproducible.
    ///
    /// A transcript without markers yields an empty sequence; that is a valid
    /// outcome, not an error.
    pub fn parse_transcript_string(content: &str, markers: &SegmentationConfig) -> Vec<Exchange> {
        let mut exchanges: Vec<Exchange> = Vec::new();
        let mut question: Option<String> = None;
        let mut answer: Option<String> = None;
        let mut mode = ScanMode::Idle;

        // Both buffers are trimmed only at flush time, so interior blank
        // lines survive while the marker-adjacent padding does not.
        let mut flush = |question: &str, answer: &str| {
            let index = exchanges.len() + 1;
            exchanges.push(Exchange::new(
                index,
                question.trim().to_string(),
                answer.trim().to_string(),
            ));
        };

        for line in content.lines() {
            if line.contains(&markers.question_marker) {
                // A prior exchange is only complete once both sides opened
                if let (Some(q), Some(a)) = (&question, &answer) {
                    flush(q, a);
                }
                question = Some(String::new());
                answer = Some(String::new());
                mode = ScanMode::Question;
                continue;
            }

            if line.contains(&markers.answer_marker) {
                mode = ScanMode::Answer;
                continue;
            }

            let buffer = match mode {
                ScanMode::Idle => None,
                ScanMode::Question => question.as_mut(),
                ScanMode::Answer => answer.as_mut(),
            };
            if let Some(buffer) = buffer {
                buffer.push_str(line);
                buffer.push('\n');
            }
        }

        // Trailing exchange
        if let (Some(q), Some(a)) = (&question, &answer) {
            flush(q, a);
        }

        exchanges
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Transcript")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Exchanges: {}", self.exchanges.len())?;
        Ok(())
    }
}
