#![deny(missing_docs)]
//! Shared logging utilities for the leafcheck workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! an item-scoped variant that prefixes every line with the upload item's
//! identity token, and a minimal test initializer for the global logger.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Logs a message for a single upload item at the given level.
///
/// The line is prefixed with `item_id=<id>` so interleaved pipelines can be
/// told apart in the log.
///
/// ```ignore
/// item_log!(Warn, item_id, "analysis failed: {}", err);
/// ```
#[macro_export]
macro_rules! item_log {
    ($level:ident, $item_id:expr, $($arg:tt)*) => {{
        log::log!(
            log::Level::$level,
            "item_id={} {}",
            $item_id,
            format_args!($($arg)*)
        );
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
