/*!
 * Background worker tests
 */

use anyhow::Result;
use std::fs;
use std::path::Path;
use filchat::app_config::Config;
use filchat::processing_job::ProcessingJob;
use filchat::processing_worker::{ProcessingWorker, WorkerEvent};
use crate::common;

fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.input_dir = root.join("input");
    config.output_dir = root.join("output");
    config.archive_dir = root.join("archives");
    config
}

/// Drain a worker's whole event stream and resolve its report
fn run_worker(job: ProcessingJob) -> (Vec<WorkerEvent>, Option<filchat::processing_job::JobReport>) {
    common::init_test_logging();
    tokio_test::block_on(async {
        let (handle, mut events) = ProcessingWorker::spawn(job);

        let mut received = Vec::new();
        while let Some(event) = events.recv().await {
            received.push(event);
        }

        let report = handle.await.expect("worker task should not panic");
        (received, report)
    })
}

/// Test that a successful run streams progress and ends with Finished
#[test]
fn test_worker_withValidJob_shouldStreamProgressThenFinish() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = test_config(temp_dir.path());
    fs::create_dir_all(&config.input_dir)?;
    common::create_test_transcript(&config.input_dir, "a.txt")?;
    let job = ProcessingJob::with_config(config);

    let (received, report) = run_worker(job);

    // The stream opens with the start notice and closes with Finished
    assert_eq!(
        received.first(),
        Some(&WorkerEvent::Progress("Processing started…".to_string()))
    );
    assert_eq!(received.last(), Some(&WorkerEvent::Finished));
    assert_eq!(
        received.iter().filter(|e| matches!(e, WorkerEvent::Finished)).count(),
        1
    );
    assert!(!received.iter().any(|e| matches!(e, WorkerEvent::Failed(_))));

    // The per-file and final count messages came through in order
    let progress: Vec<&str> = received
        .iter()
        .filter_map(|e| match e {
            WorkerEvent::Progress(message) => Some(message.as_str()),
            _ => None,
        })
        .collect();
    assert!(progress.contains(&"📄 Processing a.txt…"));
    assert!(progress.contains(&"✅ 1 file(s) processed"));

    let report = report.expect("a successful run should yield a report");
    assert_eq!(report.files_processed, 1);
    assert_eq!(report.exchanges_written, 2);
    Ok(())
}

/// Test that a rejected job emits one Failed event before Finished and
/// resolves without a report
#[test]
fn test_worker_withMissingInputDir_shouldEmitFailedThenFinished() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    // The input directory is never created, so validation refuses the job
    let job = ProcessingJob::with_config(test_config(temp_dir.path()));

    let (received, report) = run_worker(job);

    assert!(report.is_none());
    assert_eq!(received.last(), Some(&WorkerEvent::Finished));

    let failures: Vec<&str> = received
        .iter()
        .filter_map(|e| match e {
            WorkerEvent::Failed(message) => Some(message.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("does not exist"));

    // The failure is reported before the terminal event
    let failed_pos = received.iter().position(|e| matches!(e, WorkerEvent::Failed(_)));
    let finished_pos = received.iter().position(|e| matches!(e, WorkerEvent::Finished));
    assert!(failed_pos < finished_pos);
    Ok(())
}

/// Test that an unexpected mid-run failure keeps partial output, reports a
/// generic message and records the details in the issues log
#[test]
fn test_worker_withUnexpectedMidRunFailure_shouldKeepPartialOutputAndLogIssue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = test_config(temp_dir.path());
    fs::create_dir_all(&config.input_dir)?;
    common::create_test_transcript(&config.input_dir, "a.txt")?;
    // A transcript that is not valid UTF-8 fails the read after the first
    // file has already been processed
    fs::write(config.input_dir.join("z_bad.txt"), [0xff, 0xfe, 0x00, 0x01])?;
    let output_dir = config.output_dir.clone();
    let job = ProcessingJob::with_config(config);

    let (received, report) = run_worker(job);

    assert!(report.is_none());
    assert_eq!(received.last(), Some(&WorkerEvent::Finished));
    let failures: Vec<&str> = received
        .iter()
        .filter_map(|e| match e {
            WorkerEvent::Failed(message) => Some(message.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].starts_with("Unexpected error:"));

    // The exchanges written before the failure stay on disk, and the
    // failure details land in the issues log next to them
    assert!(output_dir.join("a").is_dir());
    let issues = fs::read_to_string(output_dir.join("filchat.issues.log"))?;
    assert!(issues.contains("z_bad.txt"));
    Ok(())
}
