// Binary-side lint adjustments
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use std::time::Duration;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::processing_job::ProcessingJob;
use crate::processing_worker::{ProcessingWorker, WorkerEvent};

mod app_config;
mod transcript_processor;
mod markdown_writer;
mod file_utils;
mod processing_job;
mod processing_worker;
mod progress;
mod archive_builder;
mod errors;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split chat transcripts into per-exchange Markdown files (default command)
    Split(SplitArgs),

    /// Generate shell completions for filchat
    Completions {
        /// Target shell for the completion script
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct SplitArgs {
    /// Input directory containing transcript text files
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Output directory for the generated Markdown tree
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Generate a ZIP archive of the output tree
    #[arg(short, long)]
    archive: bool,

    /// Clear a non-empty output directory before processing
    #[arg(short, long)]
    force_clean: bool,

    /// Path of the configuration file
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Log verbosity for this run
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// FilChat - Chat transcript splitter
///
/// Splits exported chat transcripts into one Markdown file per
/// question/answer exchange, ready for a static site or a note vault.
#[derive(Parser, Debug)]
#[command(name = "filchat")]
#[command(author = "FilChat Team")]
#[command(version = "0.2.0")]
#[command(about = "Chat transcript splitting tool")]
#[command(long_about = "FilChat scans a folder of exported chat transcripts and writes one Markdown file per question/answer exchange.

EXAMPLES:
    filchat transcripts/                    # Split using default config
    filchat -o notes transcripts/           # Write the Markdown tree to notes/
    filchat -a transcripts/                 # Also produce a dated ZIP archive
    filchat -f transcripts/                 # Clear a non-empty output directory first
    filchat --log-level debug transcripts/  # Process with debug logging
    filchat completions bash > filchat.bash # Generate bash completions

CONFIGURATION:
    Settings are read from conf.json, or from the file named by --config-path.
    A missing configuration file is created with defaults on first run.

SEGMENTATION:
    A transcript line containing the question marker opens a new exchange and
    a line containing the answer marker switches to its answer. Both markers
    can be customised in the configuration file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input directory containing transcript text files
    #[arg(value_name = "INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Output directory for the generated Markdown tree
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Generate a ZIP archive of the output tree
    #[arg(short, long)]
    archive: bool,

    /// Clear a non-empty output directory before processing
    #[arg(short, long)]
    force_clean: bool,

    /// Path of the configuration file
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Log verbosity for this run
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: Logger bound to a maximum level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @installs: This logger process-wide
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Level marker emoji
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color prefix for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger starts at info; the level is adjusted again once the
    // configuration has been loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "filchat", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Split(args)) => {
            // Use the explicit split subcommand args
            run_split(args).await
        }
        None => {
            // No subcommand given, treat the top-level arguments as a split
            let input_dir = cli.input_dir.ok_or_else(|| {
                anyhow!("INPUT_DIR is required when no subcommand is specified")
            })?;

            let split_args = SplitArgs {
                input_dir,
                output_dir: cli.output_dir,
                archive: cli.archive,
                force_clean: cli.force_clean,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_split(split_args).await
        }
    }
}

async fn run_split(options: SplitArgs) -> Result<()> {
    // A level given on the command line wins immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    // Load the configuration, writing a default file on first run
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open configuration file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse configuration file: {}", config_path))?;

        config
    } else {
        warn!("No configuration file at '{}', creating one with defaults.", config_path);

        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize the default configuration")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default configuration to: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    config.input_dir = options.input_dir.clone();

    if let Some(output_dir) = &options.output_dir {
        config.output_dir = output_dir.clone();
    }

    if options.archive {
        config.generate_archive = true;
    }

    if options.force_clean {
        config.force_clean = true;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate after the overrides so command line mistakes surface too
    config.validate()
        .context("Configuration validation failed")?;

    // Without a command line level the configured one applies; only the
    // maximum level changes, the logger itself stays
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    info!("🚀 FilChat: {:?} -> {:?}", config.input_dir, config.output_dir);

    // Run the job on a background worker and stream its progress
    let job = ProcessingJob::with_config(config);
    let (handle, mut events) = ProcessingWorker::spawn(job);

    let spinner = ProgressBar::new_spinner();
    let template_result = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(template_result);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Working");

    while let Some(event) = events.recv().await {
        match event {
            WorkerEvent::Progress(message) => {
                spinner.println(&message);
            }
            WorkerEvent::Failed(message) => {
                spinner.println(format!("❌ {}", message));
            }
            WorkerEvent::Finished => break,
        }
    }

    // Finish and clear the spinner so only the printed progress lines remain
    spinner.finish_and_clear();

    let report = handle.await.context("Processing task panicked")?;
    match report {
        Some(report) => {
            info!(
                "Processed {} file(s), wrote {} exchange file(s)",
                report.files_processed, report.exchanges_written
            );
            if let Some(archive_path) = &report.archive_path {
                info!("Archive: {:?}", archive_path);
            }
            Ok(())
        }
        None => {
            // The failure was already reported through the event stream
            Err(anyhow!("Processing failed"))
        }
    }
}
