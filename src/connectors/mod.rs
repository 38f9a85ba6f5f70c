//! Exchange connector implementations

pub mod binance_futures;
pub mod gate_futures;
pub mod rest;
pub mod traits;

pub use binance_futures::BinanceFuturesConnector;
pub use gate_futures::GateFuturesConnector;
pub use traits::*;

use crate::{config::AlertConfig, AlertError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported exchanges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    /// Binance USDⓈ-M futures
    Binance,
    /// Gate.io USDT futures
    Gate,
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exchange::Binance => write!(f, "binance"),
            Exchange::Gate => write!(f, "gate"),
        }
    }
}

impl std::str::FromStr for Exchange {
    type Err = AlertError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binance" => Ok(Exchange::Binance),
            "gate" | "gateio" => Ok(Exchange::Gate),
            _ => Err(AlertError::Config(format!("Unknown exchange: {}", s))),
        }
    }
}

/// Connector factory for creating funding rate sources
pub struct ConnectorFactory;

impl ConnectorFactory {
    /// Create a source for the specified exchange
    pub fn create_source(
        exchange: Exchange,
        config: &AlertConfig,
    ) -> Result<Box<dyn FundingRateSource>> {
        let fallback_rate = config.alert.fallback_rate;
        match exchange {
            Exchange::Binance => {
                let connector = BinanceFuturesConnector::new(&config.binance, fallback_rate)?;
                Ok(Box::new(connector))
            }
            Exchange::Gate => {
                let connector = GateFuturesConnector::new(&config.gate, fallback_rate)?;
                Ok(Box::new(connector))
            }
        }
    }
}
