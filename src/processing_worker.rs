use log::{error, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::errors::JobError;
use crate::file_utils::FileManager;
use crate::processing_job::{JobReport, ProcessingJob};
use crate::progress::ProgressSink;

// @module: Background execution of processing jobs

/// Operator-facing log of unexpected failures, written into the output dir.
const ISSUES_LOG_FILE: &str = "filchat.issues.log";

// @enum: Events emitted by a running worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// Human-readable progress message
    Progress(String),
    /// The job stopped on an error, described for display
    Failed(String),
    /// No further events will follow
    Finished,
}

/// Sink that forwards progress messages over the worker's event channel.
struct ChannelSink {
    sender: UnboundedSender<WorkerEvent>,
}

impl ProgressSink for ChannelSink {
    fn notify(&self, message: &str) {
        // The receiver may already be gone when the consumer stopped listening
        let _ = self.sender.send(WorkerEvent::Progress(message.to_string()));
    }
}

// @struct: Runs a job on a blocking thread and streams events back
pub struct ProcessingWorker;

impl ProcessingWorker {
    /// Run the job to completion on a blocking worker thread.
    ///
    /// Returns the task handle and the event stream. Events arrive as
    /// `Progress` messages, optionally one `Failed`, then always a final
    /// `Finished`. There is no cancellation: once spawned, the job runs to
    /// its natural end.
    pub fn spawn(
        mut job: ProcessingJob,
    ) -> (JoinHandle<Option<JobReport>>, UnboundedReceiver<WorkerEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();

        let handle = tokio::task::spawn_blocking(move || {
            let sink = ChannelSink {
                sender: sender.clone(),
            };
            let _ = sender.send(WorkerEvent::Progress("Processing started…".to_string()));

            let report = match job.execute(&sink) {
                Ok(report) => Some(report),
                Err(error) => {
                    let message = if JobError::is_user_facing(&error) {
                        warn!("Job rejected: {}", error);
                        error.to_string()
                    } else {
                        error!("Job failed unexpectedly: {:#}", error);
                        let issues_log = job.config().output_dir.join(ISSUES_LOG_FILE);
                        if let Err(log_error) =
                            FileManager::append_to_log_file(&issues_log, &format!("{:#}", error))
                        {
                            warn!("Failed to write {:?}: {}", issues_log, log_error);
                        }
                        format!("Unexpected error: {}", error)
                    };
                    let _ = sender.send(WorkerEvent::Failed(message));
                    None
                }
            };

            let _ = sender.send(WorkerEvent::Finished);
            report
        });

        (handle, receiver)
    }
}
