//! Funding rate records shared by the connectors, the merger and the alert formatter

pub mod symbol;

pub use symbol::normalize;

use crate::connectors::Exchange;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Contract status as reported by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteStatus {
    /// Contract is open for trading
    Trading,
    /// Any other state (settling, delisting, pre-trading, unknown)
    Other,
}

impl QuoteStatus {
    /// Map a raw exchange status string
    pub fn from_exchange_status(status: &str) -> Self {
        if status.eq_ignore_ascii_case("TRADING") {
            QuoteStatus::Trading
        } else {
            QuoteStatus::Other
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteStatus::Trading => write!(f, "TRADING"),
            QuoteStatus::Other => write!(f, "OTHER"),
        }
    }
}

/// One perpetual contract's funding snapshot on one exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingQuote {
    /// Exchange the quote came from
    pub exchange: Exchange,
    /// Exchange-native symbol (e.g. "BTCUSDT" or "BTC_USDT")
    pub symbol: String,
    /// Cross-exchange join key
    pub canonical_symbol: String,
    /// Mark price
    pub mark_price: f64,
    /// Current funding rate as a fraction (0.0001 = 0.01%)
    pub funding_rate: f64,
    /// Next settlement instant
    pub next_funding_time: DateTime<Utc>,
    /// Contract status
    pub status: QuoteStatus,
}

impl FundingQuote {
    /// Build a quote, deriving the canonical symbol from the native one
    pub fn new(
        exchange: Exchange,
        symbol: impl Into<String>,
        mark_price: f64,
        funding_rate: f64,
        next_funding_time: DateTime<Utc>,
        status: QuoteStatus,
    ) -> Self {
        let symbol = symbol.into();
        Self {
            exchange,
            canonical_symbol: normalize(&symbol, exchange),
            symbol,
            mark_price,
            funding_rate,
            next_funding_time,
            status,
        }
    }

    /// Whether the contract is open for trading
    pub fn is_trading(&self) -> bool {
        self.status == QuoteStatus::Trading
    }
}

/// A symbol listed on both exchanges, with the Binance minus Gate rate differential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedQuote {
    /// Join key
    pub canonical_symbol: String,
    /// Binance mark price
    pub binance_mark_price: f64,
    /// Binance funding rate
    pub binance_rate: f64,
    /// Binance next settlement
    pub binance_next_time: DateTime<Utc>,
    /// Gate mark price
    pub gate_mark_price: f64,
    /// Gate funding rate
    pub gate_rate: f64,
    /// Gate next settlement
    pub gate_next_time: DateTime<Utc>,
    /// `binance_rate - gate_rate`
    pub rate_diff: f64,
}

impl MergedQuote {
    /// Join one Binance quote with one Gate quote
    pub fn from_pair(binance: &FundingQuote, gate: &FundingQuote) -> Self {
        Self {
            canonical_symbol: binance.canonical_symbol.clone(),
            binance_mark_price: binance.mark_price,
            binance_rate: binance.funding_rate,
            binance_next_time: binance.next_funding_time,
            gate_mark_price: gate.mark_price,
            gate_rate: gate.funding_rate,
            gate_next_time: gate.next_funding_time,
            rate_diff: binance.funding_rate - gate.funding_rate,
        }
    }

    /// Whether both legs settle at `instant`
    pub fn settles_at(&self, instant: DateTime<Utc>) -> bool {
        self.binance_next_time == instant && self.gate_next_time == instant
    }
}

/// Time between two funding settlements of one contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingInterval {
    /// Exchange-native symbol
    pub symbol: String,
    /// Join key
    pub canonical_symbol: String,
    /// Settlement cadence in seconds
    pub interval_secs: u64,
}

impl FundingInterval {
    /// Build an interval record, deriving the canonical symbol
    pub fn new(exchange: Exchange, symbol: impl Into<String>, interval_secs: u64) -> Self {
        let symbol = symbol.into();
        Self {
            canonical_symbol: normalize(&symbol, exchange),
            symbol,
            interval_secs,
        }
    }
}

/// Funding cadence of one symbol on both exchanges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalPair {
    /// Join key
    pub canonical_symbol: String,
    /// Binance interval in seconds
    pub binance_interval_secs: u64,
    /// Gate interval in seconds
    pub gate_interval_secs: u64,
}

impl IntervalPair {
    /// The two exchanges settle this symbol on different cadences
    pub fn is_mismatch(&self) -> bool {
        self.binance_interval_secs != self.gate_interval_secs
    }
}

/// Result of a single-symbol funding rate lookup
#[derive(Debug, Clone, PartialEq)]
pub enum RateLookup {
    /// Rate returned by the exchange
    Quoted(f64),
    /// Lookup failed; the configured default was substituted
    Fallback {
        /// Substituted rate
        rate: f64,
        /// Why the lookup failed
        reason: String,
    },
}

impl RateLookup {
    /// The rate, genuine or substituted
    pub fn rate(&self) -> f64 {
        match self {
            RateLookup::Quoted(rate) => *rate,
            RateLookup::Fallback { rate, .. } => *rate,
        }
    }

    /// Whether the value is a substitute
    pub fn is_fallback(&self) -> bool {
        matches!(self, RateLookup::Fallback { .. })
    }
}
