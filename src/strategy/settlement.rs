//! Next funding settlement resolution

use crate::data::{FundingQuote, MergedQuote};
use chrono::{DateTime, Utc};

/// Earliest upcoming settlement across both exchanges.
///
/// Uses the full per-exchange tables rather than the merged view, since a symbol listed on
/// one exchange only still tells us when that exchange settles next. `None` when both are empty.
pub fn resolve_next_settlement(binance: &[FundingQuote], gate: &[FundingQuote]) -> Option<DateTime<Utc>> {
    binance
        .iter()
        .chain(gate.iter())
        .map(|q| q.next_funding_time)
        .min()
}

/// Merged rows whose Binance and Gate legs both settle exactly at `instant`
pub fn filter_at(merged: &[MergedQuote], instant: DateTime<Utc>) -> Vec<MergedQuote> {
    merged
        .iter()
        .filter(|row| row.settles_at(instant))
        .cloned()
        .collect()
}

/// Quotes of a single exchange that settle at `instant`
pub fn quotes_at(quotes: &[FundingQuote], instant: DateTime<Utc>) -> Vec<FundingQuote> {
    quotes
        .iter()
        .filter(|q| q.next_funding_time == instant)
        .cloned()
        .collect()
}
