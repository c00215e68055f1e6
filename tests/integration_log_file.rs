use duolog::{Logger, Origin, OutputOptions, Status, Stream};
use std::sync::Arc;
use tempfile::tempdir;

fn no_color() -> OutputOptions {
    OutputOptions {
        color: false,
        ..Default::default()
    }
}

/// End-to-end session: assign a file, log one formatted message, flush.
/// The file must contain a header block followed by a single body line with
/// the origin tag, the message, a timestamp, and no color escapes.
#[test]
fn logged_session_produces_header_and_tagged_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.log");

    // Pin the file width so the body stays on one line regardless of the
    // terminal the tests run in.
    let options = OutputOptions {
        max_line_length_file: 120,
        ..no_color()
    };
    let logger = Logger::with_options(options);
    assert_eq!(logger.set_log_file(&path, false), Status::Ok);
    assert_eq!(
        logger.log_message(Origin::new("a.cpp", 10, "main"), "hello"),
        Status::Ok
    );
    assert_eq!(logger.flush(), Status::Ok);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    // Header block: rule, timestamp, rule.
    assert!(lines[0].chars().all(|c| c == '-'));
    assert_eq!(lines[0].len(), 29);
    assert!(lines[1].starts_with("     "));
    assert!(lines[2].chars().all(|c| c == '-'));

    // One body line carrying every piece of origin metadata.
    let body = lines[3];
    assert!(body.contains("a.cpp"));
    assert!(body.contains("10"));
    assert!(body.contains("main()"));
    assert!(body.contains("hello"));
    assert!(body.starts_with('('), "missing timestamp: {}", body);
    assert!(!content.contains('\x1b'));
    assert_eq!(lines.len(), 4);
}

/// N threads reporting M unique payloads each end up with exactly N*M body
/// lines in the file: none dropped, none duplicated.
#[test]
fn concurrent_reporting_keeps_every_message() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("concurrent.log");
    let options = OutputOptions {
        timestamp: false,
        wrap_file: false,
        ..no_color()
    };
    let logger = Arc::new(Logger::with_file(&path, false, options));

    let threads = 8;
    let per_thread = 50;
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                for i in 0..per_thread {
                    let payload = format!("payload-{}-{}", t, i);
                    assert!(logger.report_raw(&payload, Stream::Stdout).is_ok());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(logger.flush(), Status::Ok);

    let content = std::fs::read_to_string(&path).unwrap();
    let body: Vec<&str> = content
        .lines()
        .filter(|l| l.starts_with("payload-"))
        .collect();
    assert_eq!(body.len(), threads * per_thread);
    for t in 0..threads {
        for i in 0..per_thread {
            let needle = format!("payload-{}-{}", t, i);
            assert_eq!(
                body.iter().filter(|l| ***l == *needle).count(),
                1,
                "missing or duplicated: {}",
                needle
            );
        }
    }
}

/// A named session header plus a later unnamed flush share one header block,
/// and switching files starts a fresh session in the new file.
#[test]
fn named_session_and_file_switch() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");
    let options = OutputOptions {
        timestamp: false,
        ..no_color()
    };

    let logger = Logger::with_file(&first, false, options);
    assert_eq!(logger.prepare_log_file(Some("nightly build")), Status::Ok);
    logger.log_raw("first body");
    logger.flush();

    assert_eq!(logger.set_log_file(&second, false), Status::Ok);
    logger.log_raw("second body");
    drop(logger);

    let first_content = std::fs::read_to_string(&first).unwrap();
    assert!(first_content.contains("     nightly build"));
    assert!(first_content.contains("first body"));
    // Exactly one header block despite prepare + flush.
    let rules = first_content
        .lines()
        .filter(|l| l.starts_with("---"))
        .count();
    assert_eq!(rules, 2);
    // The rule spans max(19, name length) + 10 columns.
    let rule = first_content.lines().next().unwrap();
    assert_eq!(rule.len(), 29);

    // Drop flushed the second file, with its own header.
    let second_content = std::fs::read_to_string(&second).unwrap();
    assert!(second_content.contains("second body"));
    let rules = second_content
        .lines()
        .filter(|l| l.starts_with("---"))
        .count();
    assert_eq!(rules, 2);
}

/// Long messages wrap in the file according to the file width, and the
/// stripped continuation content reproduces the original text.
#[test]
fn file_output_wraps_to_configured_width() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wrapped.log");
    let options = OutputOptions {
        timestamp: false,
        max_line_length_file: 24,
        extra_indent: false,
        ..no_color()
    };
    let logger = Logger::with_file(&path, false, options);

    let text = "abcdef".repeat(12); // 72 chars, width 24
    logger.log_message(Origin::none(), &text);
    drop(logger);

    let content = std::fs::read_to_string(&path).unwrap();
    let body: Vec<&str> = content
        .lines()
        .filter(|l| !l.starts_with("---") && !l.starts_with("     ") && !l.is_empty())
        .collect();

    assert_eq!(body.len(), 3); // ceil(72 / 24)
    for line in &body {
        assert!(line.chars().count() <= 24);
    }
    assert_eq!(body.concat(), text);
}
