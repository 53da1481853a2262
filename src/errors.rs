/*!
 * Error types for the filchat application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;

use thiserror::Error;

/// User-recoverable job conditions.
///
/// These are the conditions a user can fix themselves (pick another directory,
/// enable force-clean, wait for the running job). They are reported as their
/// message alone, in contrast to unexpected I/O failures which propagate as
/// `anyhow::Error` with the full cause chain attached.
#[derive(Error, Debug)]
pub enum JobError {
    /// The input directory was never set (empty path)
    #[error("the input directory is not set")]
    MissingInputDir,

    /// The configured input path does not exist as a directory
    #[error("the input directory '{}' does not exist", .0.display())]
    InputDirNotFound(PathBuf),

    /// The output directory exists and contains files, and force-clean is off
    #[error(
        "the output directory '{}' is not empty. \
         Enable the force-clean option or empty it manually.",
        .0.display()
    )]
    OutputDirNotEmpty(PathBuf),

    /// Another job currently owns the output directory
    #[error("another job is already running against the output directory '{}'", .0.display())]
    OutputDirBusy(PathBuf),
}

impl JobError {
    /// Whether an arbitrary error is one of the user-recoverable conditions.
    ///
    /// The job layer is the boundary that separates the two error classes;
    /// callers use this to decide between a plain user message and a full
    /// diagnostic dump to the operator log.
    pub fn is_user_facing(error: &anyhow::Error) -> bool {
        error.downcast_ref::<JobError>().is_some()
    }
}
