/*!
 * # FilChat - Chat Transcript Splitter
 *
 * A Rust library for splitting exported chat transcripts into per-exchange
 * Markdown files.
 *
 * ## Features
 *
 * - Scan transcript text files for question/answer markers
 * - Write one Markdown file per exchange, with frontmatter
 * - Batch processing of a whole input folder
 * - Optional dated ZIP archive of the generated tree
 * - Configurable markers, directories and logging
 *
 * ## Architecture
 *
 * The pipeline is assembled from these modules:
 * - `app_config`: Run settings, loaded from JSON with per-field defaults
 * - `transcript_processor`: Transcript scanning and exchange extraction
 * - `markdown_writer`: Markdown rendering and file naming
 * - `processing_job`: Batch run orchestration, from validation to archive
 * - `processing_worker`: Background execution with progress events
 * - `progress`: Progress reporting seam
 * - `archive_builder`: ZIP archiving of the output tree
 * - `file_utils`: Shared filesystem helpers
 * - `errors`: The user-recoverable error conditions
 *
 * ## License
 *
 * MIT
 */

// Crate-wide lint adjustments
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod app_config;
pub mod transcript_processor;
pub mod markdown_writer;
pub mod processing_job;
pub mod processing_worker;
pub mod progress;
pub mod archive_builder;
pub mod file_utils;
pub mod errors;

// Re-exports covering the usual entry points
pub use app_config::{Config, SegmentationConfig};
pub use transcript_processor::{Exchange, Transcript};
pub use markdown_writer::MarkdownWriter;
pub use processing_job::{JobReport, JobState, ProcessingJob};
pub use processing_worker::{ProcessingWorker, WorkerEvent};
pub use progress::{LogSink, MemorySink, ProgressSink};
pub use errors::JobError;
