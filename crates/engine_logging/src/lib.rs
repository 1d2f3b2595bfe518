#![deny(missing_docs)]
//! Logging macros shared by the evidence client crates.
//!
//! Every crate logs through the `engine_*` macros so the binary decides the
//! sinks in one place. Tests call [`initialize_for_tests`] to see output from
//! the code under test.

/// Logs a trace-level message.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Level used by [`initialize_for_tests`]; `EVIDENCE_TEST_LOG=trace` etc. overrides it.
pub fn test_level() -> log::LevelFilter {
    std::env::var("EVIDENCE_TEST_LOG")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(log::LevelFilter::Debug)
}

/// Installs a logger whose output the test harness captures per test.
///
/// No-op if a logger is already installed.
pub fn initialize_for_tests() {
    let config = simplelog::ConfigBuilder::new()
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .build();
    let _ = simplelog::TestLogger::init(test_level(), config);
}
