use serde::{Deserialize, Serialize};

/// Output formatting options for a [`Logger`](crate::Logger) instance.
///
/// The options control how [`compose`](crate::format::compose) renders a
/// message for a given destination. Console and file destinations carry
/// separate wrap toggles and width limits because a message is rendered twice
/// by the `report*` family: once for the terminal and once for the log file.
///
/// A width of `0` means "auto": the terminal width is probed for the console
/// value, and the file value inherits the console value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Colorize console output with ANSI escape sequences.
    ///
    /// Only honored when the destination stream is an interactive terminal;
    /// file output never contains escape sequences.
    pub color: bool,

    /// Prepend a `(<timestamp>)` prefix to messages destined for the file.
    pub timestamp: bool,

    /// Break console lines that exceed the maximum line length.
    pub wrap_tty: bool,

    /// Break file lines that exceed the maximum line length.
    pub wrap_file: bool,

    /// Number of spaces prepended to every physical line.
    pub indent: u16,

    /// Maximum line length on the terminal. `0` probes the terminal width.
    pub max_line_length_tty: u16,

    /// Maximum line length in the file. `0` inherits the terminal value.
    pub max_line_length_file: u16,

    /// Align continuation lines under the message body instead of the tag.
    pub extra_indent: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            color: true,
            timestamp: true,
            wrap_tty: true,
            wrap_file: true,
            indent: 0,
            max_line_length_tty: 0,
            max_line_length_file: 0,
            extra_indent: true,
        }
    }
}
