//! Logging utilities

use crate::Result;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Registry,
};

const DEFAULT_LOG_FILE_NAME: &str = "funding-alert.log";

/// Initialize console and daily-rotated file logging.
///
/// `RUST_LOG` overrides `log_level` when set. Fails if a global subscriber is already installed.
pub fn init<P: AsRef<Path>>(log_level: &str, log_file: P) -> Result<()> {
    let log_file = log_file.as_ref();
    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory)?;

    let file_name = log_file
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new(DEFAULT_LOG_FILE_NAME));
    let file_appender = RollingFileAppender::new(Rotation::DAILY, directory, file_name);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true);

    // No colour codes in files
    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Log the resolved settlement with structured fields
#[macro_export]
macro_rules! log_settlement {
    ($level:ident, $instant:expr, $binance_count:expr, $gate_count:expr, $comparable:expr, $($field:tt)*) => {
        tracing::$level!(
            next_funding_time = %$instant,
            binance_contracts = $binance_count,
            gate_contracts = $gate_count,
            comparable_symbols = $comparable,
            $($field)*
        );
    };
}

/// Log one symbol's cross-exchange funding differential
#[macro_export]
macro_rules! log_rate_diff {
    ($level:ident, $symbol:expr, $binance_rate:expr, $gate_rate:expr, $rate_diff:expr, $($field:tt)*) => {
        tracing::$level!(
            symbol = %$symbol,
            binance_rate = %$binance_rate,
            gate_rate = %$gate_rate,
            rate_diff = %$rate_diff,
            $($field)*
        );
    };
}
