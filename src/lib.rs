//! Cross-Exchange Funding Rate Alert
//!
//! Polls Binance and Gate.io perpetual futures for funding rates, joins both tables on a
//! canonical symbol, and delivers a Telegram summary shortly before the next funding settlement.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alert;
pub mod config;
pub mod connectors;
pub mod data;
pub mod strategy;
pub mod utils;

// Re-export commonly used types
pub use alert::{AlertService, FundingSummary};
pub use config::AlertConfig;
pub use connectors::{Exchange, FundingRateSource};
pub use data::{FundingQuote, MergedQuote};

/// Result type used throughout the application
pub type Result<T> = anyhow::Result<T>;

/// Common error types for the alert system
#[derive(thiserror::Error, Debug)]
pub enum AlertError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    DataParsing(String),

    /// Alert delivery error
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// Neither exchange reported an upcoming settlement
    #[error("No upcoming funding settlement: {0}")]
    NoSettlement(String),
}

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
