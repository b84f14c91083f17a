#![deny(missing_docs)]
//! Logging front door for rollcall.
//!
//! Core, engine and binary log through the `rollcall_*` macros so a single
//! `log` backend sees every cycle, fetch and publish. The HTTP stack used for
//! roster fetches and chat calls is chatty at debug level; [`base_config`]
//! keeps it out of the rollcall log unless it reports an error.

use simplelog::{Config, ConfigBuilder};

/// Log targets of the HTTP client and TLS stack, muted below error level.
pub const QUIET_TARGETS: &[&str] = &["reqwest", "hyper", "hyper_util", "rustls", "h2"];

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! rollcall_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! rollcall_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! rollcall_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! rollcall_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! rollcall_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Logger configuration shared by the binary and tests: RFC 3339 timestamps,
/// [`QUIET_TARGETS`] filtered out.
pub fn base_config() -> Config {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_rfc3339()
        .set_target_level(log::LevelFilter::Error);
    for target in QUIET_TARGETS {
        builder.add_filter_ignore_str(*target);
    }
    builder.build()
}

/// Terminal logger for tests. A no-op once any logger is installed.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may have won the race to set the logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        base_config(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
