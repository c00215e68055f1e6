//! Console stream identity and terminal helpers.
//!
//! The formatter itself is a pure function; everything that has to know about
//! the process environment (which stream a message targets, whether that
//! stream is a terminal, how wide the terminal is) lives here.

use std::io::IsTerminal;

/// Fallback line width when the terminal width cannot be determined.
pub const FALLBACK_LINE_WIDTH: u16 = 80;

/// Identifies the console stream a message is written to.
///
/// Errors target [`Stream::Stderr`], everything else [`Stream::Stdout`].
/// The stream identity decides whether color escapes are appropriate: they
/// are emitted only when the selected stream is an interactive terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Standard output, used for regular messages.
    Stdout,
    /// Standard error, used for error messages.
    Stderr,
}

impl Stream {
    /// Whether this stream is connected to an interactive terminal.
    pub fn is_terminal(self) -> bool {
        match self {
            Stream::Stdout => std::io::stdout().is_terminal(),
            Stream::Stderr => std::io::stderr().is_terminal(),
        }
    }
}

/// Probe the width of the controlling terminal in columns.
///
/// Queried only when a configured maximum line length is `0`. Falls back to
/// [`FALLBACK_LINE_WIDTH`] when stdout is not a terminal or the query fails.
#[cfg(unix)]
pub fn terminal_width() -> u16 {
    let mut size: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut size) };
    if rc == 0 && size.ws_col > 0 {
        size.ws_col
    } else {
        FALLBACK_LINE_WIDTH
    }
}

/// Probe the width of the controlling terminal in columns.
#[cfg(not(unix))]
pub fn terminal_width() -> u16 {
    FALLBACK_LINE_WIDTH
}
