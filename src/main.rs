//! # duolog - formatted console/file tee
//!
//! Reads lines from stdin and reports each one through a [`Logger`]: the line
//! is printed to stdout (colorized where appropriate) and, when a log file is
//! configured, mirrored into it with a timestamp through the buffered queue.
//!
//! ```text
//! some-long-running-job | duolog --log-file job.log --session "nightly build"
//! ```
//!
//! Formatting can be controlled per destination via flags or loaded from a
//! JSON options file. The log level of internal diagnostics is controlled via
//! the `RUST_LOG` environment variable as usual.

use anyhow::{Context, Result};
use clap::Parser;
use duolog::{make_log_name, Logger, OutputOptions, Status, Stream};
use std::io::BufRead;
use std::path::PathBuf;
use tracing::{debug, info};

/// Mirror stdin to the console and a buffered log file
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// Log file to mirror into; console-only when omitted
    #[clap(short = 'f', long)]
    log_file: Option<PathBuf>,

    /// Derive the log file name from this stem, e.g. "run" -> run_<date>.log
    #[clap(long, conflicts_with = "log_file")]
    named_log: Option<String>,

    /// Replace existing log file content instead of appending
    #[clap(long, default_value_t = false)]
    truncate: bool,

    /// Session name shown in the log file header
    #[clap(short = 's', long)]
    session: Option<String>,

    /// Number of buffered messages that triggers a flush to file
    #[clap(short = 'q', long, default_value_t = duolog::defaults::MAX_QUEUE_LENGTH)]
    queue_length: usize,

    /// Indentation applied to every output line
    #[clap(long, default_value_t = 0)]
    indent: u16,

    /// Maximum console line length (0 = probe the terminal)
    #[clap(long, default_value_t = 0)]
    width: u16,

    /// Maximum file line length (0 = same as console)
    #[clap(long, default_value_t = 0)]
    file_width: u16,

    /// Disable line wrapping for both destinations
    #[clap(long, default_value_t = false)]
    no_wrap: bool,

    /// Disable colorized console output
    #[clap(long, default_value_t = false)]
    no_color: bool,

    /// Omit timestamps from file output
    #[clap(long, default_value_t = false)]
    no_timestamp: bool,

    /// Load output options from a JSON file (flags override it)
    #[clap(long)]
    options: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let options = build_options(&args)?;
    debug!(?options, "resolved output options");

    let log_file = match (&args.log_file, &args.named_log) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(stem)) => Some(PathBuf::from(make_log_name(stem))),
        (None, None) => None,
    };

    let logger = match &log_file {
        Some(path) => {
            info!(path = %path.display(), "mirroring to log file");
            Logger::with_file(path, !args.truncate, options)
        }
        None => Logger::with_options(options),
    };
    logger.set_max_queue_length(args.queue_length);

    if let Some(name) = &args.session {
        if logger.prepare_log_file(Some(name)) == Status::OpenFailed {
            anyhow::bail!("cannot open log file {:?}", log_file);
        }
    }

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        logger.report_raw(&line, Stream::Stdout);
    }

    // Dropping the logger would flush too; doing it explicitly lets a write
    // failure show up in the exit code.
    match logger.flush() {
        Status::OpenFailed | Status::WriteFailed => {
            anyhow::bail!("failed to flush messages to {:?}", log_file)
        }
        _ => Ok(()),
    }
}

/// Resolve output options from the JSON file (if given) and the CLI flags.
fn build_options(args: &Args) -> Result<OutputOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read options file {:?}", path))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid options file {:?}", path))?
        }
        None => OutputOptions::default(),
    };

    if args.no_color {
        options.color = false;
    }
    if args.no_timestamp {
        options.timestamp = false;
    }
    if args.no_wrap {
        options.wrap_tty = false;
        options.wrap_file = false;
    }
    if args.indent != 0 {
        options.indent = args.indent;
    }
    if args.width != 0 {
        options.max_line_length_tty = args.width;
    }
    if args.file_width != 0 {
        options.max_line_length_file = args.file_width;
    }

    Ok(options)
}
