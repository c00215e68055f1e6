//! Message composition: origin tags, timestamps, color, and line wrapping.
//!
//! [`compose`] turns raw caller text plus optional origin metadata into the
//! final rendered string. The rendered string is immutable from here on: it
//! is either printed to a console stream or pushed into the message queue
//! verbatim.
//!
//! The general shape of a rendered message is
//!
//! ```text
//! (<timestamp>)  ERROR  [<file> | <line> | <function>()]: <text>
//! ```
//!
//! where every element before `<text>` is optional. Long messages are broken
//! into physical lines that fit the destination's width budget; continuation
//! lines can be aligned under the start of the message body so the tag column
//! stays visually separate.

use crate::options::OutputOptions;
use crate::style::{self, Stream};
use colored::Colorize;

/// Optional origin metadata attached to a formatted message.
///
/// Each field is independently optional. The line number is only rendered
/// when the file name is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Origin<'a> {
    /// Source file the message originates from.
    pub file: Option<&'a str>,
    /// Line number within `file`.
    pub line: Option<u32>,
    /// Function the message originates from, without parentheses.
    pub function: Option<&'a str>,
}

impl<'a> Origin<'a> {
    /// Origin with all fields present.
    pub fn new(file: &'a str, line: u32, function: &'a str) -> Self {
        Self {
            file: Some(file),
            line: Some(line),
            function: Some(function),
        }
    }

    /// Origin with no metadata; the bracketed tag is omitted entirely.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Current local time as `YYYY-MM-DD|HH:MM:SS` (19 columns, locale independent).
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d|%H:%M:%S").to_string()
}

/// Number of columns [`timestamp`] occupies; the session header rule is sized
/// against this.
pub const TIMESTAMP_WIDTH: usize = 19;

/// Build a log file name of the form `<name>_<date-time>.log`.
///
/// The date-time part uses `-` and `T` instead of `:` and `|` so the result
/// is safe to use as a file name. The underscore is omitted when `name` is
/// empty.
pub fn make_log_name(name: &str) -> String {
    let stamp = chrono::Local::now().format("%Y-%m-%dT%H-%M-%S");
    if name.is_empty() {
        format!("{}.log", stamp)
    } else {
        format!("{}_{}.log", name, stamp)
    }
}

/// Render a message for the given destination.
///
/// Color escapes are emitted only when the message is not destined for the
/// file, `options.color` is set, and `stream` is an interactive terminal.
/// A timestamp prefix is emitted only for file destinations with
/// `options.timestamp` set.
pub fn compose(
    origin: Origin<'_>,
    text: &str,
    is_error: bool,
    to_file: bool,
    options: &OutputOptions,
    stream: Stream,
) -> String {
    let colorize = !to_file && options.color && stream.is_terminal();
    compose_with(origin, text, is_error, to_file, colorize, options)
}

/// Render a message with an explicit color decision.
///
/// [`compose`] derives the decision from the destination and stream; this
/// entry point exists so the color path stays testable without a terminal.
pub(crate) fn compose_with(
    origin: Origin<'_>,
    text: &str,
    is_error: bool,
    to_file: bool,
    colorize: bool,
    options: &OutputOptions,
) -> String {
    let wrap = if to_file {
        options.wrap_file
    } else {
        options.wrap_tty
    };

    // Width budget for one physical line. Only probed when wrapping applies;
    // the fallback still bounds the extra-indent clamp below.
    let mut max_len = style::FALLBACK_LINE_WIDTH as usize;
    if wrap {
        let configured = if to_file && options.max_line_length_file != 0 {
            options.max_line_length_file
        } else {
            options.max_line_length_tty
        };
        max_len = if configured != 0 {
            configured as usize
        } else {
            style::terminal_width() as usize
        };
    }

    let indent_width = options.indent as usize;
    let indent = " ".repeat(indent_width);
    // The indent eats into the budget; keep at least one usable column so
    // the splitter below always makes progress.
    max_len = max_len.saturating_sub(indent_width).max(1);

    let mut out = String::new();
    out.push_str(&indent);

    // Visible width of the tag prefix, excluding the indent and any escape
    // sequence bytes. Continuation lines are aligned against this.
    let mut tag_width = 0usize;

    if to_file && options.timestamp {
        let stamp = format!("({}) ", timestamp());
        tag_width += stamp.len();
        out.push_str(&stamp);
    }

    if is_error {
        let tag = " ERROR  ";
        tag_width += tag.len();
        if colorize {
            out.push_str(&tag.bright_red().bold().to_string());
        } else {
            out.push_str(tag);
        }
    }

    match (origin.file, origin.function) {
        (Some(file), function) => {
            out.push('[');
            tag_width += 1;
            if colorize {
                out.push_str(&file.yellow().to_string());
            } else {
                out.push_str(file);
            }
            tag_width += file.chars().count();
            if let Some(line) = origin.line {
                let line = line.to_string();
                out.push_str(" | ");
                if colorize {
                    out.push_str(&line.green().to_string());
                } else {
                    out.push_str(&line);
                }
                tag_width += 3 + line.len();
            }
            if let Some(function) = function {
                out.push_str(" | ");
                out.push_str(function);
                out.push_str("()]: ");
                tag_width += 3 + function.chars().count() + 5;
            } else {
                out.push_str("]: ");
                tag_width += 3;
            }
        }
        (None, Some(function)) => {
            out.push('[');
            out.push_str(function);
            out.push_str("()]: ");
            tag_width += 1 + function.chars().count() + 5;
        }
        (None, None) => {}
    }

    // Alignment width for continuation lines. A very wide tag would leave no
    // room for content, so clamp it back to a third of the budget.
    let mut extra_width = tag_width;
    if extra_width > max_len * 2 / 3 {
        extra_width = max_len / 3;
    }
    let extra = if options.extra_indent {
        " ".repeat(extra_width)
    } else {
        String::new()
    };

    if wrap {
        // Available content width: the first physical line shares the line
        // with the tag; continuation lines are only narrowed when they carry
        // the alignment prefix.
        let first_avail = max_len.saturating_sub(extra_width).max(1);
        let cont_avail = if options.extra_indent {
            first_avail
        } else {
            max_len
        };

        for (i, line) in text.lines().enumerate() {
            let mut rest = line;
            if i == 0 {
                let (head, tail) = split_at_width(rest, first_avail);
                out.push_str(head);
                rest = tail;
            } else if rest.is_empty() {
                // Preserve explicit blank lines.
                out.push('\n');
                out.push_str(&indent);
                out.push_str(&extra);
                continue;
            }
            while !rest.is_empty() {
                let (head, tail) = split_at_width(rest, cont_avail);
                out.push('\n');
                out.push_str(&indent);
                out.push_str(&extra);
                out.push_str(head);
                rest = tail;
            }
        }
    } else {
        // No width-based breaking; only explicit newlines produce
        // continuation lines, which still receive the alignment prefix.
        for (i, line) in text.lines().enumerate() {
            if i > 0 {
                out.push('\n');
                out.push_str(&indent);
                out.push_str(&extra);
            }
            out.push_str(line);
        }
    }

    out
}

/// Split `s` after at most `width` characters, at a character boundary.
///
/// `width` must be at least 1 so every call consumes input.
fn split_at_width(s: &str, width: usize) -> (&str, &str) {
    match s.char_indices().nth(width) {
        Some((idx, _)) => (&s[..idx], &s[idx..]),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_options() -> OutputOptions {
        OutputOptions {
            color: false,
            timestamp: false,
            wrap_tty: true,
            wrap_file: true,
            indent: 0,
            max_line_length_tty: 80,
            max_line_length_file: 80,
            extra_indent: true,
        }
    }

    #[test]
    fn test_identity_without_formatting() {
        // Wrapping disabled, no origin, no error, console destination:
        // the rendered message is exactly the input text.
        let options = OutputOptions {
            wrap_tty: false,
            ..plain_options()
        };

        for text in ["hello", "multi\nline\ntext", "", "trailing spaces   "] {
            let rendered =
                compose_with(Origin::none(), text, false, false, false, &options);
            assert_eq!(rendered, text);
        }
    }

    #[test]
    fn test_full_origin_tag() {
        let rendered = compose_with(
            Origin::new("a.cpp", 10, "main"),
            "hello",
            false,
            false,
            false,
            &plain_options(),
        );
        assert_eq!(rendered, "[a.cpp | 10 | main()]: hello");
    }

    #[test]
    fn test_origin_without_function() {
        let origin = Origin {
            file: Some("lib.rs"),
            line: Some(42),
            function: None,
        };
        let rendered = compose_with(origin, "x", false, false, false, &plain_options());
        assert_eq!(rendered, "[lib.rs | 42]: x");
    }

    #[test]
    fn test_origin_function_only() {
        let origin = Origin {
            file: None,
            line: None,
            function: Some("setup"),
        };
        let rendered = compose_with(origin, "x", false, false, false, &plain_options());
        assert_eq!(rendered, "[setup()]: x");
    }

    #[test]
    fn test_origin_line_without_file_is_omitted() {
        let origin = Origin {
            file: None,
            line: Some(7),
            function: None,
        };
        let rendered = compose_with(origin, "x", false, false, false, &plain_options());
        assert_eq!(rendered, "x");
    }

    #[test]
    fn test_error_tag() {
        let rendered =
            compose_with(Origin::none(), "boom", true, false, false, &plain_options());
        assert_eq!(rendered, " ERROR  boom");
    }

    #[test]
    fn test_error_tag_colorized() {
        colored::control::set_override(true);
        let rendered =
            compose_with(Origin::none(), "boom", true, false, true, &plain_options());
        colored::control::unset_override();

        assert!(rendered.contains("\x1b["));
        assert!(rendered.contains("ERROR"));
        assert!(rendered.ends_with("boom"));
    }

    #[test]
    fn test_file_destination_has_timestamp_and_no_color() {
        let options = OutputOptions {
            timestamp: true,
            ..plain_options()
        };
        let rendered = compose_with(
            Origin::new("a.cpp", 10, "main"),
            "hello",
            false,
            true,
            false,
            &options,
        );

        assert!(rendered.starts_with('('));
        assert!(rendered.contains(") [a.cpp | 10 | main()]: hello"));
        assert!(!rendered.contains('\x1b'));
        // "(YYYY-MM-DD|HH:MM:SS) " prefix
        assert_eq!(rendered.find(')'), Some(TIMESTAMP_WIDTH + 1));
    }

    #[test]
    fn test_wrapping_line_count_and_reconstruction() {
        let options = OutputOptions {
            max_line_length_tty: 20,
            extra_indent: false,
            ..plain_options()
        };
        let text = "abcdefghij".repeat(7); // 70 chars, width 20

        let rendered =
            compose_with(Origin::none(), &text, false, false, false, &options);
        let lines: Vec<&str> = rendered.split('\n').collect();

        assert_eq!(lines.len(), 4); // ceil(70 / 20)
        for line in &lines {
            assert!(line.chars().count() <= 20);
        }
        assert_eq!(lines.concat(), text);
    }

    #[test]
    fn test_wrapping_aligns_continuation_lines() {
        let options = OutputOptions {
            max_line_length_tty: 40,
            ..plain_options()
        };
        let origin = Origin {
            file: None,
            line: None,
            function: Some("fmt"),
        };
        let text = "x".repeat(60);

        let rendered = compose_with(origin, &text, false, false, false, &options);
        let lines: Vec<&str> = rendered.split('\n').collect();

        // Tag "[fmt()]: " is 9 columns wide; continuation lines are indented
        // by the same amount and every line fits the budget.
        assert!(lines.len() > 1);
        for line in &lines[1..] {
            assert!(line.starts_with("         "));
            assert!(line.chars().count() <= 40);
        }
        let body: String = lines
            .iter()
            .map(|l| l.trim_start_matches(' '))
            .collect::<Vec<_>>()
            .concat()
            .replace("[fmt()]: ", "");
        assert_eq!(body, text);
    }

    #[test]
    fn test_indent_prefixes_every_line() {
        let options = OutputOptions {
            indent: 4,
            max_line_length_tty: 20,
            extra_indent: false,
            ..plain_options()
        };
        let rendered =
            compose_with(Origin::none(), "one\ntwo", false, false, false, &options);
        assert_eq!(rendered, "    one\n    two");
    }

    #[test]
    fn test_oversized_tag_clamps_to_third_of_budget() {
        let options = OutputOptions {
            max_line_length_tty: 30,
            ..plain_options()
        };
        // Tag wider than 2/3 of 30 columns.
        let origin = Origin {
            file: Some("a_rather_long_file_name.rs"),
            line: Some(123),
            function: None,
        };
        let rendered =
            compose_with(origin, &"y".repeat(50), false, false, false, &options);

        // Continuation lines fall back to 1/3 of the budget: 10 spaces of
        // alignment, at most 20 characters of content.
        for line in rendered.split('\n').skip(1) {
            assert!(line.starts_with("          y"));
            assert!(line.chars().count() <= 30);
        }
    }

    #[test]
    fn test_tiny_width_with_large_indent_terminates() {
        // Residual edge case: the indent alone exceeds the width budget.
        // The splitter must still consume at least one character per line.
        let options = OutputOptions {
            indent: 12,
            max_line_length_tty: 8,
            ..plain_options()
        };
        let rendered =
            compose_with(Origin::none(), "abcdefgh", false, false, false, &options);

        let stripped: String = rendered
            .split('\n')
            .map(|l| l.trim_start_matches(' '))
            .collect();
        assert_eq!(stripped, "abcdefgh");
    }

    #[test]
    fn test_blank_logical_lines_survive_wrapping() {
        let options = OutputOptions {
            max_line_length_tty: 20,
            extra_indent: false,
            ..plain_options()
        };
        let rendered =
            compose_with(Origin::none(), "a\n\nb", false, false, false, &options);
        assert_eq!(rendered, "a\n\nb");
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundaries() {
        let options = OutputOptions {
            max_line_length_tty: 10,
            extra_indent: false,
            ..plain_options()
        };
        let text = "äöü".repeat(10); // 30 chars, 60 bytes

        let rendered = compose_with(Origin::none(), &text, false, false, false, &options);
        let lines: Vec<&str> = rendered.split('\n').collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines.concat(), text);
    }

    #[test]
    fn test_make_log_name() {
        let name = make_log_name("run");
        assert!(name.starts_with("run_"));
        assert!(name.ends_with(".log"));
        assert!(!name.contains(':'));
        assert!(!name.contains('|'));

        let bare = make_log_name("");
        assert!(!bare.starts_with('_'));
        assert!(bare.ends_with(".log"));
    }

    #[test]
    fn test_timestamp_width() {
        assert_eq!(timestamp().len(), TIMESTAMP_WIDTH);
    }
}
