//! # duolog
//!
//! A process-local, thread-safe text logger that prints formatted messages to
//! the console and optionally mirrors them into a log file through a bounded
//! in-memory queue.
//!
//! ## Message kinds and operation families
//!
//! Three kinds of messages are supported:
//!
//! - **Raw** strings are printed unchanged
//! - **Messages** are formatted with optional origin metadata (file, line,
//!   function) to show where they come from
//! - **Errors** are formatted like messages, carry an extra `ERROR` tag, and
//!   target stderr
//!
//! Each kind can be handled by one of three operation families:
//!
//! - `show_*` prints the (formatted) message to stdout or stderr
//! - `log_*` queues the message for the log file
//! - `report_*` does both
//!
//! All operations work without a configured log file, but then nothing is
//! written to disk and they return [`Status::NoLogFile`]. With a file set,
//! messages are not written immediately: they are buffered and flushed when
//! the queue exceeds a configurable maximum length, on an explicit
//! [`Logger::flush`], or when the instance is dropped.
//!
//! ## Usage example
//!
//! ```rust,no_run
//! use duolog::{Logger, Origin, OutputOptions, Stream};
//!
//! let logger = Logger::with_file("run.log", false, OutputOptions::default());
//! logger.report_raw("starting up", Stream::Stdout);
//! logger.report_message(Origin::new(file!(), line!(), "main"), "hello");
//! logger.flush();
//! ```
//!
//! A global instance can be installed with [`build_global_logger`] and used
//! through the [`report_raw!`], [`report_message!`], and [`report_error!`]
//! macros, which supply the caller's file, line, and function automatically
//! and fall back to plain console printing when no global logger exists.
//!
//! ## Concurrency model
//!
//! Every [`Logger`] operation runs under one mutex per instance, so messages
//! from concurrent threads never interleave within a line. The registry
//! functions are the exception: build/replace/delete of the global logger
//! must be serialized by the caller (do it outside parallel sections).

/// Message composition: origin tags, timestamps, and line wrapping
///
/// Contains the pure [`compose`](format::compose) function that turns raw
/// text plus metadata into the final rendered string, plus helpers for
/// locale-independent timestamps and log file names.
pub mod format;

/// Process-wide logger registry and the `report_*!` convenience macros
pub mod global;

/// The logger instance: lock, operation families, queue/flush protocol
pub mod logger;

/// Output formatting options shared by console and file destinations
pub mod options;

/// FIFO buffer of rendered messages awaiting a file write
pub mod queue;

/// File sink: log file path, append/truncate mode, session headers
pub mod sink;

/// Console stream identity, tty detection, and the terminal-width probe
pub mod style;

pub use format::{compose, make_log_name, Origin};
pub use global::{
    build_global_logger, build_global_logger_with_file, delete_global_logger, global_logger,
};
pub use logger::{Logger, Status};
pub use options::OutputOptions;
pub use queue::MessageQueue;
pub use sink::{FileSink, SinkError};
pub use style::Stream;

/// The current version of the crate, populated from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values.
pub mod defaults {
    /// Queue length at which a flush to file is triggered automatically.
    ///
    /// Ten messages keeps the number of open/write/close cycles low without
    /// letting much output sit in memory if the process dies.
    pub const MAX_QUEUE_LENGTH: usize = 10;
}
