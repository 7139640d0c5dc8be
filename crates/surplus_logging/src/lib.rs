#![deny(missing_docs)]
//! Shared logging utilities for the surplus_watch workspace.
//!
//! This crate provides the `watch_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Messages logged
//! while a poll cycle is active on the current thread are prefixed with the
//! cycle number.

use std::cell::Cell;

#[doc(hidden)]
pub use log as __log;

thread_local! {
    /// Sequence number of the poll cycle running on this thread, 0 when idle.
    static CYCLE: Cell<u64> = const { Cell::new(0) };
}

/// Marks `cycle` as the poll cycle running on the current thread.
///
/// The scheduler owns a single thread, so every log line emitted while the
/// cycle runs carries the same prefix.
pub fn set_cycle(cycle: u64) {
    CYCLE.with(|v| v.set(cycle));
}

/// Clears the cycle marker for the current thread.
pub fn clear_cycle() {
    CYCLE.with(|v| v.set(0));
}

/// Returns the cycle running on the current thread, if any.
pub fn current_cycle() -> Option<u64> {
    match CYCLE.with(|v| v.get()) {
        0 => None,
        cycle => Some(cycle),
    }
}

/// Logs at `$level`, prefixing the active cycle number when one is set.
#[doc(hidden)]
#[macro_export]
macro_rules! __watch_log {
    ($level:expr, $($arg:tt)*) => {{
        match $crate::current_cycle() {
            Some(cycle) => $crate::__log::log!(
                $level,
                "[cycle {}] {}",
                cycle,
                format_args!($($arg)*)
            ),
            None => $crate::__log::log!($level, $($arg)*),
        }
    }};
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! watch_trace {
    ($($arg:tt)*) => {{
        $crate::__watch_log!($crate::__log::Level::Trace, $($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! watch_debug {
    ($($arg:tt)*) => {{
        $crate::__watch_log!($crate::__log::Level::Debug, $($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! watch_info {
    ($($arg:tt)*) => {{
        $crate::__watch_log!($crate::__log::Level::Info, $($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! watch_warn {
    ($($arg:tt)*) => {{
        $crate::__watch_log!($crate::__log::Level::Warn, $($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! watch_error {
    ($($arg:tt)*) => {{
        $crate::__watch_log!($crate::__log::Level::Error, $($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
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
