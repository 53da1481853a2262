use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Configuration module
/// Gathers every knob of a run: directories, archive and clean-up
/// switches, segmentation markers and log verbosity.
/// Settings for one processing run
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory containing the transcript files to split
    #[serde(default)]
    pub input_dir: PathBuf,

    /// Directory receiving one subdirectory per transcript
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Whether to zip the output tree after a successful run
    #[serde(default)]
    pub generate_archive: bool,

    /// Whether a pre-existing non-empty output directory may be deleted
    #[serde(default)]
    pub force_clean: bool,

    /// Directory receiving the dated ZIP archive
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,

    /// Segmentation config
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Verbosity of the run's log output
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Markers delimiting the turns of a transcript.
///
/// The defaults match the French ChatGPT export format the tool was written
/// for. A line containing `question_marker` opens a new exchange; a line
/// containing `answer_marker` switches accumulation to the answer side.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SegmentationConfig {
    /// Literal substring that introduces the user's turn
    #[serde(default = "default_question_marker")]
    pub question_marker: String,

    /// Literal substring that introduces the assistant's turn
    #[serde(default = "default_answer_marker")]
    pub answer_marker: String,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            question_marker: default_question_marker(),
            answer_marker: default_answer_marker(),
        }
    }
}

/// Verbosity of the stderr log
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_archive_dir() -> PathBuf {
    // The archive lands in the current working directory, next to where the
    // tool was launched, not inside the output tree.
    PathBuf::from(".")
}

fn default_question_marker() -> String {
    "Vous avez dit :".to_string()
}

fn default_answer_marker() -> String {
    "ChatGPT a dit :".to_string()
}

impl Config {
    /// Check the settings for values no run could work with
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow!("The output directory must not be empty"));
        }

        // An empty marker is contained in every line and would turn the whole
        // transcript into mode transitions.
        if self.segmentation.question_marker.is_empty() {
            return Err(anyhow!("The question marker must not be empty"));
        }
        if self.segmentation.answer_marker.is_empty() {
            return Err(anyhow!("The answer marker must not be empty"));
        }
        if self.segmentation.question_marker == self.segmentation.answer_marker {
            return Err(anyhow!(
                "The question marker and the answer marker must differ"
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_dir: PathBuf::new(),
            output_dir: default_output_dir(),
            generate_archive: false,
            force_clean: false,
            archive_dir: default_archive_dir(),
            segmentation: SegmentationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
