//! The logger instance: one coarse lock around formatting options, the
//! message queue, and the file sink.
//!
//! Three families of operations exist for each message kind (raw, formatted
//! message, formatted error):
//!
//! - `show_*` prints to the console stream and never touches the queue
//! - `log_*` renders with file options, enqueues, and flushes at the
//!   queue threshold
//! - `report_*` does both
//!
//! Messages are not written to the file immediately: they are buffered in a
//! FIFO queue that is flushed when it reaches the configured maximum length,
//! on an explicit [`Logger::flush`], or when the instance is dropped. The
//! session header is written lazily by the first flush after a file is
//! assigned.
//!
//! Every public operation acquires the instance lock; internal helpers take
//! `&mut Inner` and assume the lock is already held, so a flush triggered
//! from inside an enqueue cannot deadlock on its own instance.

use crate::format::{self, Origin};
use crate::options::OutputOptions;
use crate::queue::MessageQueue;
use crate::sink::{FileSink, SinkError};
use crate::style::Stream;
use parking_lot::Mutex;
use std::path::PathBuf;
use tracing::debug;

/// Outcome of a logger operation.
///
/// I/O failures are surfaced here and echoed to stderr; they are never
/// retried and never terminate the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The operation completed.
    Ok,
    /// The operation was valid but no log file is configured; console output
    /// still happened where applicable.
    NoLogFile,
    /// The log file could not be opened.
    OpenFailed,
    /// Writing to the log file failed.
    WriteFailed,
    /// The call does not apply to the current state, e.g. deleting a global
    /// logger that was never built.
    InvalidUse,
}

impl Status {
    /// Whether the operation completed without failure.
    ///
    /// [`Status::NoLogFile`] counts as a configuration state, not a failure.
    pub fn is_ok(self) -> bool {
        matches!(self, Status::Ok | Status::NoLogFile)
    }
}

/// State guarded by the instance lock.
#[derive(Debug)]
struct Inner {
    options: OutputOptions,
    queue: MessageQueue,
    sink: FileSink,
    max_queue_length: usize,
}

/// Thread-safe logger printing to the console and mirroring into a log file.
///
/// All operations on one instance are serialized by a single mutex, so
/// concurrent callers never interleave within a message. Note that a stuck
/// filesystem stalls the caller holding the lock and therefore every other
/// caller; there is no timeout mechanism.
#[derive(Debug)]
pub struct Logger {
    inner: Mutex<Inner>,
}

impl Logger {
    /// Logger without a log file, using default options.
    pub fn new() -> Self {
        Self::with_options(OutputOptions::default())
    }

    /// Logger without a log file.
    pub fn with_options(options: OutputOptions) -> Self {
        Self {
            inner: Mutex::new(Inner {
                options,
                queue: MessageQueue::new(),
                sink: FileSink::new(),
                max_queue_length: crate::defaults::MAX_QUEUE_LENGTH,
            }),
        }
    }

    /// Logger writing to `path`, appending to existing content if `append`.
    pub fn with_file<P: Into<PathBuf>>(path: P, append: bool, options: OutputOptions) -> Self {
        Self {
            inner: Mutex::new(Inner {
                options,
                queue: MessageQueue::new(),
                sink: FileSink::with_path(path, append),
                max_queue_length: crate::defaults::MAX_QUEUE_LENGTH,
            }),
        }
    }

    // ----- raw messages -----

    /// Print a string to the selected stream and mirror it into the log file.
    ///
    /// Returns [`Status::NoLogFile`] if no file is configured; the console
    /// print still happened in that case.
    pub fn report_raw(&self, message: &str, stream: Stream) -> Status {
        let mut inner = self.inner.lock();
        print_to(stream, message);
        if !inner.sink.is_configured() {
            return Status::NoLogFile;
        }
        inner.enqueue(message.to_string())
    }

    /// Print a string to the selected stream without formatting.
    pub fn show_raw(&self, message: &str, stream: Stream) -> Status {
        let _inner = self.inner.lock();
        print_to(stream, message);
        Status::Ok
    }

    /// Queue a string for the log file without formatting.
    ///
    /// The message is buffered even when no file is configured yet; it is
    /// written once a file is assigned and the queue is flushed.
    pub fn log_raw(&self, message: &str) -> Status {
        self.inner.lock().enqueue(message.to_string())
    }

    // ----- formatted messages -----

    /// Print a formatted message to stdout and mirror it into the log file.
    pub fn report_message(&self, origin: Origin<'_>, text: &str) -> Status {
        self.report_formatted(origin, text, false)
    }

    /// Print a formatted message to stdout.
    ///
    /// Color is allowed, the timestamp is suppressed (console policy).
    pub fn show_message(&self, origin: Origin<'_>, text: &str) {
        let inner = self.inner.lock();
        inner.print_formatted(origin, text, false);
    }

    /// Queue a formatted message for the log file.
    ///
    /// The timestamp is allowed, color is suppressed (file policy).
    pub fn log_message(&self, origin: Origin<'_>, text: &str) -> Status {
        let mut inner = self.inner.lock();
        let rendered = inner.render_for_file(origin, text, false);
        inner.enqueue(rendered)
    }

    // ----- formatted errors -----

    /// Print a formatted error to stderr and mirror it into the log file.
    pub fn report_error(&self, origin: Origin<'_>, text: &str) -> Status {
        self.report_formatted(origin, text, true)
    }

    /// Print a formatted error to stderr.
    pub fn show_error(&self, origin: Origin<'_>, text: &str) {
        let inner = self.inner.lock();
        inner.print_formatted(origin, text, true);
    }

    /// Queue a formatted error for the log file.
    pub fn log_error(&self, origin: Origin<'_>, text: &str) -> Status {
        let mut inner = self.inner.lock();
        let rendered = inner.render_for_file(origin, text, true);
        inner.enqueue(rendered)
    }

    fn report_formatted(&self, origin: Origin<'_>, text: &str, is_error: bool) -> Status {
        let mut inner = self.inner.lock();
        inner.print_formatted(origin, text, is_error);
        if !inner.sink.is_configured() {
            return Status::NoLogFile;
        }
        let rendered = inner.render_for_file(origin, text, is_error);
        inner.enqueue(rendered)
    }

    // ----- flush & file management -----

    /// Write all queued messages to the log file.
    ///
    /// No-op success when the queue is empty; [`Status::NoLogFile`] when no
    /// file is configured. Writes the session header first if this is the
    /// first write since the file was assigned.
    pub fn flush(&self) -> Status {
        self.inner.lock().flush()
    }

    /// Write a session header with an optional name to the log file.
    ///
    /// [`Logger::flush`] does this implicitly (without a name) on its first
    /// write; call this eagerly to give the session block a title. A no-op if
    /// the header for the current file was already written.
    pub fn prepare_log_file(&self, session_name: Option<&str>) -> Status {
        let mut inner = self.inner.lock();
        if !inner.sink.is_configured() {
            return Status::NoLogFile;
        }
        match inner.sink.ensure_header(session_name) {
            Ok(()) => Status::Ok,
            Err(err) => surface(&err),
        }
    }

    /// Switch to a new log file.
    ///
    /// Pending messages are flushed to the old file first (best effort, the
    /// switch happens regardless); the next write to the new file starts with
    /// a fresh session header. Returns the status of the old-file flush.
    pub fn set_log_file<P: Into<PathBuf>>(&self, path: P, append: bool) -> Status {
        let mut inner = self.inner.lock();
        let status = if inner.sink.is_configured() {
            inner.flush()
        } else {
            Status::Ok
        };
        inner.sink.set_path(path, append);
        status
    }

    /// The configured log file, if any.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.inner.lock().sink.path().map(PathBuf::from)
    }

    // ----- configuration -----

    /// Queue length at which a flush is triggered automatically.
    pub fn max_queue_length(&self) -> usize {
        self.inner.lock().max_queue_length
    }

    /// Set the auto-flush threshold.
    ///
    /// Does not flush by itself; an over-long queue drains on the next
    /// enqueue or explicit flush.
    pub fn set_max_queue_length(&self, length: usize) {
        self.inner.lock().max_queue_length = length.max(1);
    }

    /// Current output options.
    pub fn options(&self) -> OutputOptions {
        self.inner.lock().options
    }

    /// Replace the output options.
    pub fn set_options(&self, options: OutputOptions) {
        self.inner.lock().options = options;
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    /// A logger never discards buffered messages on destruction: the final
    /// flush happens here. Failures are echoed to stderr like any other
    /// flush failure.
    fn drop(&mut self) {
        let _ = self.inner.get_mut().flush();
    }
}

impl Inner {
    /// Render for the console and print under the held lock.
    fn print_formatted(&self, origin: Origin<'_>, text: &str, is_error: bool) {
        let stream = if is_error {
            Stream::Stderr
        } else {
            Stream::Stdout
        };
        let rendered = format::compose(origin, text, is_error, false, &self.options, stream);
        print_to(stream, &rendered);
    }

    /// Render with file policy: timestamp allowed, color suppressed.
    fn render_for_file(&self, origin: Origin<'_>, text: &str, is_error: bool) -> String {
        format::compose(origin, text, is_error, true, &self.options, Stream::Stdout)
    }

    /// Push a rendered message and flush if the queue reached the threshold.
    fn enqueue(&mut self, rendered: String) -> Status {
        let length = self.queue.push(rendered);
        if length >= self.max_queue_length {
            return self.flush();
        }
        if !self.sink.is_configured() {
            return Status::NoLogFile;
        }
        Status::Ok
    }

    /// Drain the queue into the file sink; assumes the lock is held.
    fn flush(&mut self) -> Status {
        if !self.sink.is_configured() {
            return Status::NoLogFile;
        }
        if self.queue.is_empty() {
            return Status::Ok;
        }

        // Header failure keeps the queue intact so a later flush can retry.
        if let Err(err) = self.sink.ensure_header(None) {
            return surface(&err);
        }

        let lines = self.queue.drain_all();
        debug!(count = lines.len(), "flushing message queue");
        // Once drained, a failed write loses these messages; the failure
        // itself is surfaced to the operator instead.
        if let Err(err) = self.sink.append_lines(&lines) {
            return surface(&err);
        }
        Status::Ok
    }
}

/// Echo a sink failure to stderr and translate it into a status value.
fn surface(err: &SinkError) -> Status {
    eprintln!("Logger: {}", err);
    match err {
        SinkError::NotConfigured => Status::NoLogFile,
        SinkError::Open { .. } => Status::OpenFailed,
        SinkError::Write { .. } => Status::WriteFailed,
    }
}

fn print_to(stream: Stream, message: &str) {
    match stream {
        Stream::Stdout => println!("{}", message),
        Stream::Stderr => eprintln!("{}", message),
    }
}
