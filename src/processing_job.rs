use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::archive_builder::ArchiveBuilder;
use crate::errors::JobError;
use crate::file_utils::FileManager;
use crate::markdown_writer::MarkdownWriter;
use crate::progress::ProgressSink;
use crate::transcript_processor::Transcript;

// @module: Job orchestration from validation to archive

/// Output directories with a job currently running against them.
///
/// Two jobs writing the same tree would interleave their files and the
/// force-clean step of one would delete the output of the other, so
/// ownership is claimed for the whole run and released when it ends.
static ACTIVE_OUTPUT_DIRS: Lazy<Mutex<HashSet<PathBuf>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Claim on an output directory, released on drop.
struct OutputDirGuard {
    key: PathBuf,
}

impl OutputDirGuard {
    // @checks: the absolute path, so "output" and "./output" collide
    fn acquire(output_dir: &Path) -> Result<Self> {
        let key = std::path::absolute(output_dir).unwrap_or_else(|_| output_dir.to_path_buf());
        let mut active = ACTIVE_OUTPUT_DIRS.lock();
        if !active.insert(key.clone()) {
            return Err(JobError::OutputDirBusy(output_dir.to_path_buf()).into());
        }
        Ok(Self { key })
    }
}

impl Drop for OutputDirGuard {
    fn drop(&mut self) {
        ACTIVE_OUTPUT_DIRS.lock().remove(&self.key);
    }
}

// @enum: Lifecycle stages of a processing job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Freshly constructed, nothing checked yet
    Created,
    /// Configuration and input directory verified
    Validated,
    /// Output directory ready to receive files
    OutputPrepared,
    /// Currently processing transcripts
    Running,
    /// Run finished without error
    Succeeded,
    /// Run aborted on the first error
    Failed,
}

// @struct: Summary of a completed run
#[derive(Debug, Clone)]
pub struct JobReport {
    // @field: Number of transcript files processed
    pub files_processed: usize,
    // @field: Total number of exchange files written
    pub exchanges_written: usize,
    // @field: Where the archive landed, when one was requested
    pub archive_path: Option<PathBuf>,
}

// @struct: One batch run over a folder of transcripts
pub struct ProcessingJob {
    // @field: Settings driving the run
    config: Config,
    // @field: Current lifecycle stage
    state: JobState,
}

impl ProcessingJob {
    /// Create a job from an application configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            state: JobState::Created,
        }
    }

    /// Current lifecycle stage of this job.
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Settings this job runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check that the configuration is coherent and the input directory exists.
    pub fn validate(&mut self) -> Result<()> {
        self.config.validate()?;

        if self.config.input_dir.as_os_str().is_empty() {
            return Err(JobError::MissingInputDir.into());
        }
        if !FileManager::dir_exists(&self.config.input_dir) {
            return Err(JobError::InputDirNotFound(self.config.input_dir.clone()).into());
        }

        self.state = JobState::Validated;
        Ok(())
    }

    /// Make sure the output directory can receive files.
    ///
    /// An absent or empty directory passes as-is. A non-empty one is wiped
    /// when force-clean is enabled and refused otherwise, leaving its
    /// contents untouched.
    pub fn prepare_output_directory(&mut self) -> Result<()> {
        if self.state == JobState::Created {
            self.validate()?;
        }

        let output_dir = self.config.output_dir.clone();
        if output_dir.exists() {
            let mut entries = fs::read_dir(&output_dir)
                .with_context(|| format!("Failed to inspect output directory: {:?}", output_dir))?;
            if entries.next().is_some() {
                if self.config.force_clean {
                    info!("Force-clean enabled, clearing output directory {:?}", output_dir);
                    fs::remove_dir_all(&output_dir).with_context(|| {
                        format!("Failed to clear output directory: {:?}", output_dir)
                    })?;
                } else {
                    return Err(JobError::OutputDirNotEmpty(output_dir).into());
                }
            }
        }

        self.state = JobState::OutputPrepared;
        Ok(())
    }

    /// Run the job end to end, reporting progress through the sink.
    ///
    /// Ownership of the output directory is claimed for the whole call, then
    /// stages not yet driven explicitly (validation, output preparation) are
    /// run before the files are processed. The first error aborts the run and
    /// moves the job to `Failed`; files already written stay on disk.
    pub fn execute(&mut self, sink: &dyn ProgressSink) -> Result<JobReport> {
        let result = self.execute_inner(sink);
        self.state = match result {
            Ok(_) => JobState::Succeeded,
            Err(_) => JobState::Failed,
        };
        result
    }

    fn execute_inner(&mut self, sink: &dyn ProgressSink) -> Result<JobReport> {
        // Claimed before any stage is driven: a competing job's force-clean
        // preparation must never reach a tree another run still owns
        let _guard = OutputDirGuard::acquire(&self.config.output_dir)?;

        if self.state == JobState::Created {
            self.validate()?;
        }
        if self.state == JobState::Validated {
            self.prepare_output_directory()?;
        }

        self.state = JobState::Running;
        self.run(sink)
    }

    // @returns: Report of what the run produced
    fn run(&self, sink: &dyn ProgressSink) -> Result<JobReport> {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

        // One date for the whole run, even across midnight
        let run_date = Local::now().date_naive();

        let files = FileManager::list_files_with_extension(&self.config.input_dir, "txt")?;
        info!(
            "Found {} transcript file(s) in {:?}",
            files.len(),
            self.config.input_dir
        );

        let mut exchanges_written = 0;
        for file in &files {
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            sink.notify(&format!("📄 Processing {}…", file_name));

            let target_dir = output_dir.join(FileManager::normalize_file_stem(&file_name));
            // Every transcript gets its subdirectory, even one without exchanges
            FileManager::ensure_dir(&target_dir)?;
            let transcript = Transcript::parse_file(file, &self.config.segmentation)?;
            for exchange in &transcript.exchanges {
                MarkdownWriter::write_exchange(&target_dir, exchange, run_date)?;
            }

            info!(
                "{} exchange(s) written for {}",
                transcript.exchanges.len(),
                file_name
            );
            exchanges_written += transcript.exchanges.len();
        }

        sink.notify(&format!("✅ {} file(s) processed", files.len()));

        let archive_path = if self.config.generate_archive {
            sink.notify("📦 Creating ZIP archive…");
            let archive_name = format!("{}.zip", run_date.format("%Y%m%d"));
            FileManager::ensure_dir(&self.config.archive_dir)?;
            let archive_path = self.config.archive_dir.join(archive_name);
            let entries = ArchiveBuilder::create_archive(output_dir, &archive_path)?;
            sink.notify("✅ Archive created successfully");
            info!("Archive generated with {} entries: {:?}", entries, archive_path);
            Some(archive_path)
        } else {
            None
        };

        Ok(JobReport {
            files_processed: files.len(),
            exchanges_written,
            archive_path,
        })
    }
}
