//! Settings management utilities

use crate::{AlertError, Result};
use std::env;

/// Environment variable expansion utility
pub struct EnvExpander;

impl EnvExpander {
    /// Expand environment variables in a string
    /// Supports the ${VAR_NAME} pattern
    pub fn expand(input: &str) -> Result<String> {
        let mut result = input.to_string();
        let mut search_from = 0;

        while let Some(offset) = result[search_from..].find("${") {
            let start = search_from + offset;
            if let Some(end) = result[start..].find('}') {
                let var_name = &result[start + 2..start + end];
                let var_value = env::var(var_name)
                    .map_err(|_| AlertError::Config(
                        format!("Environment variable '{}' not found", var_name)
                    ))?;

                result.replace_range(start..start + end + 1, &var_value);
                // Values are inserted verbatim, never re-expanded
                search_from = start + var_value.len();
            } else {
                return Err(AlertError::Config(
                    "Unclosed environment variable reference".to_string()
                ).into());
            }
        }

        Ok(result)
    }
}

/// Configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a positive value
    pub fn validate_positive(value: f64, name: &str) -> Result<()> {
        if value <= 0.0 {
            return Err(AlertError::Config(
                format!("{} must be positive", name)
            ).into());
        }
        Ok(())
    }

    /// Validate an http(s) URL; the HTTP client is built without SOCKS support
    pub fn validate_url(url: &str, name: &str) -> Result<()> {
        if url.is_empty() {
            return Err(AlertError::Config(
                format!("{} cannot be empty", name)
            ).into());
        }

        let parsed = url::Url::parse(url)
            .map_err(|e| AlertError::Config(format!("{} must be a valid URL: {}", name, e)))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(AlertError::Config(
                format!("{} has unsupported scheme '{}'", name, other)
            ).into()),
        }
    }
}

/// Configuration defaults
pub struct ConfigDefaults;

impl ConfigDefaults {
    /// Binance USDⓈ-M futures REST base
    pub const BINANCE_REST_URL: &'static str = "https://fapi.binance.com";

    /// Gate.io v4 REST base
    pub const GATE_REST_URL: &'static str = "https://api.gateio.ws/api/v4";

    /// Telegram Bot API base
    pub const TELEGRAM_API_URL: &'static str = "https://api.telegram.org";

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Seconds between two polling cycles
    pub const POLL_INTERVAL_SECS: u64 = 300;

    /// Half-width of the alert window around the next settlement
    pub const ALERT_WINDOW_SECS: u64 = 1800;

    /// Longest accepted alert window, one day
    pub const MAX_ALERT_WINDOW_SECS: u64 = 86_400;

    /// Longest accepted pause between polling cycles, one day
    pub const MAX_POLL_INTERVAL_SECS: u64 = 86_400;

    /// Entries per ranking section
    pub const TOP_N: usize = 3;

    /// Rate reported when a single-symbol lookup fails
    pub const FALLBACK_FUNDING_RATE: f64 = 0.0001;

    /// Binance cadence for symbols absent from `/fapi/v1/fundingInfo`
    pub const BINANCE_DEFAULT_INTERVAL_HOURS: u64 = 8;
}
