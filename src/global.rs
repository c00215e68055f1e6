//! Process-wide logger registry and convenience macros.
//!
//! The registry holds at most one [`Logger`] for the whole process. It owns
//! that instance: callers receive [`Arc`] handles but should tear the logger
//! down through [`delete_global_logger`] so the final flush is guaranteed.
//!
//! The slot itself is data-race free, but build/replace/delete are not meant
//! to run concurrently: two racing builders leave an arbitrary winner
//! installed. Set the global logger up before spawning worker threads and
//! delete it after joining them.

use crate::logger::{Logger, Status};
use crate::options::OutputOptions;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;

static GLOBAL_LOGGER: RwLock<Option<Arc<Logger>>> = RwLock::new(None);

/// Install a global logger without a log file.
///
/// An already-installed logger is flushed and replaced.
pub fn build_global_logger(options: OutputOptions) -> Arc<Logger> {
    install(Logger::with_options(options))
}

/// Install a global logger writing to `path`.
///
/// An already-installed logger is flushed and replaced.
pub fn build_global_logger_with_file<P: Into<PathBuf>>(
    path: P,
    append: bool,
    options: OutputOptions,
) -> Arc<Logger> {
    install(Logger::with_file(path, append, options))
}

/// Remove the global logger, flushing its message queue.
///
/// Returns [`Status::InvalidUse`] when no global logger is installed, the
/// flush failure status if the final flush failed, [`Status::Ok`] otherwise.
pub fn delete_global_logger() -> Status {
    let previous = GLOBAL_LOGGER.write().take();
    match previous {
        None => Status::InvalidUse,
        Some(logger) => match logger.flush() {
            status @ (Status::OpenFailed | Status::WriteFailed) => status,
            _ => Status::Ok,
        },
    }
}

/// The current global logger, if one has been built.
pub fn global_logger() -> Option<Arc<Logger>> {
    GLOBAL_LOGGER.read().clone()
}

fn install(logger: Logger) -> Arc<Logger> {
    let logger = Arc::new(logger);
    let previous = GLOBAL_LOGGER.write().replace(Arc::clone(&logger));
    if let Some(old) = previous {
        // Other holders may keep the old instance alive, so flush explicitly
        // instead of relying on its destructor.
        let _ = old.flush();
    }
    logger
}

/// Name of the enclosing function, without its module path.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        name.rsplit("::").next().unwrap_or(name)
    }};
}

/// Report a raw message through the global logger.
///
/// Falls back to a plain `println!` when no global logger is installed, so
/// the message is never silently dropped.
#[macro_export]
macro_rules! report_raw {
    ($msg:expr) => {{
        let __message: &str = $msg.as_ref();
        match $crate::global_logger() {
            Some(__logger) => {
                let _ = __logger.report_raw(__message, $crate::Stream::Stdout);
            }
            None => println!("{}", __message),
        }
    }};
}

/// Report a formatted message through the global logger, supplying the
/// calling file, line, and function as origin metadata.
///
/// Falls back to a plain `println!` with the same tag layout when no global
/// logger is installed.
#[macro_export]
macro_rules! report_message {
    ($msg:expr) => {{
        let __message: &str = $msg.as_ref();
        let __origin = $crate::Origin {
            file: Some(file!()),
            line: Some(line!()),
            function: Some($crate::__function_name!()),
        };
        match $crate::global_logger() {
            Some(__logger) => {
                let _ = __logger.report_message(__origin, __message);
            }
            None => println!(
                "[{} | {} | {}()]: {}",
                file!(),
                line!(),
                $crate::__function_name!(),
                __message
            ),
        }
    }};
}

/// Report a formatted error through the global logger, supplying the calling
/// file, line, and function as origin metadata.
///
/// Falls back to a plain `eprintln!` with the same tag layout when no global
/// logger is installed.
#[macro_export]
macro_rules! report_error {
    ($msg:expr) => {{
        let __message: &str = $msg.as_ref();
        let __origin = $crate::Origin {
            file: Some(file!()),
            line: Some(line!()),
            function: Some($crate::__function_name!()),
        };
        match $crate::global_logger() {
            Some(__logger) => {
                let _ = __logger.report_error(__origin, __message);
            }
            None => eprintln!(
                " ERROR  [{} | {} | {}()]: {}",
                file!(),
                line!(),
                $crate::__function_name!(),
                __message
            ),
        }
    }};
}
