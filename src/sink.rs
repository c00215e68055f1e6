//! File sink: owns the log file path, the append/truncate mode, and the
//! session-header state.
//!
//! The sink never keeps the file handle open between calls; every operation
//! opens, writes, and closes. That costs a little performance per flush but
//! cannot leak a descriptor across a long-lived logger and keeps the file
//! safe to inspect between writes.

use crate::format::{self, TIMESTAMP_WIDTH};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// I/O failures surfaced by the file sink.
///
/// Failures are reported, never retried: a logger that cannot write must not
/// stall or terminate the program on its own.
#[derive(Debug, Error)]
pub enum SinkError {
    /// No log file has been configured; file operations are no-ops.
    #[error("no log file configured")]
    NotConfigured,

    /// The log file could not be opened.
    #[error("could not open log file '{path}': {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing to the log file failed part-way through.
    #[error("error writing to log file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Writes rendered messages and session headers to the configured log file.
#[derive(Debug, Default)]
pub struct FileSink {
    path: Option<PathBuf>,
    append: bool,
    header_written: bool,
}

impl FileSink {
    /// Sink with no file configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink writing to `path`, appending to existing content if `append`.
    pub fn with_path<P: Into<PathBuf>>(path: P, append: bool) -> Self {
        Self {
            path: Some(path.into()),
            append,
            header_written: false,
        }
    }

    /// The configured log file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether a log file is configured.
    pub fn is_configured(&self) -> bool {
        self.path.is_some()
    }

    /// Whether the session header has already been written.
    pub fn header_written(&self) -> bool {
        self.header_written
    }

    /// Point the sink at a new file.
    ///
    /// Resets the header state so the next write starts a new session block.
    /// Existing content of the new target is left untouched until the header
    /// is written (and then only removed in truncate mode).
    pub fn set_path<P: Into<PathBuf>>(&mut self, path: P, append: bool) {
        let path = path.into();
        debug!(path = %path.display(), append, "switching log file");
        self.path = Some(path);
        self.append = append;
        self.header_written = false;
    }

    /// Write the session header block unless it already exists.
    ///
    /// The header marks the start of a logging session:
    ///
    /// ```text
    /// -----------------------------
    ///      <session name>          (optional)
    ///      <timestamp>
    /// -----------------------------
    /// ```
    ///
    /// In append mode a blank line separates the header from any previous
    /// session; truncate mode discards the old content instead. On failure
    /// the header state is left unset so a later call retries.
    pub fn ensure_header(&mut self, session_name: Option<&str>) -> Result<(), SinkError> {
        if self.header_written {
            return Ok(());
        }
        let path = self.path.as_ref().ok_or(SinkError::NotConfigured)?;

        // The rule spans the wider of the name and the timestamp, plus five
        // columns of padding on either side.
        let name_len = session_name.map_or(0, str::len);
        let rule = "-".repeat(name_len.max(TIMESTAMP_WIDTH) + 10);

        let mut open_options = OpenOptions::new();
        open_options.write(true).create(true);
        if self.append {
            open_options.append(true);
        } else {
            open_options.truncate(true);
        }
        let mut file = open_options.open(path).map_err(|source| SinkError::Open {
            path: path.clone(),
            source,
        })?;

        let mut block = String::new();
        if self.append {
            block.push('\n');
        }
        block.push_str(&rule);
        block.push('\n');
        if let Some(name) = session_name {
            block.push_str("     ");
            block.push_str(name);
            block.push('\n');
        }
        block.push_str("     ");
        block.push_str(&format::timestamp());
        block.push('\n');
        block.push_str(&rule);
        block.push('\n');

        file.write_all(block.as_bytes())
            .map_err(|source| SinkError::Write {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), "wrote session header");
        self.header_written = true;
        Ok(())
    }

    /// Append rendered lines to the log file, one line terminator each.
    ///
    /// Always opens in append mode; the header logic guarantees any
    /// pre-existing content is intentional. If a write fails mid-sequence the
    /// call aborts; lines already handed to the OS are not rolled back.
    pub fn append_lines<I, S>(&mut self, lines: I) -> Result<(), SinkError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = self.path.as_ref().ok_or(SinkError::NotConfigured)?;

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|source| SinkError::Open {
                path: path.clone(),
                source,
            })?;

        for line in lines {
            writeln!(file, "{}", line.as_ref()).map_err(|source| SinkError::Write {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
