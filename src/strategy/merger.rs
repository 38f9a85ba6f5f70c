//! Cross-exchange joins on the canonical symbol

use crate::data::{FundingInterval, FundingQuote, IntervalPair, MergedQuote};
use std::collections::HashMap;

/// Inner-join Binance and Gate quotes on canonical symbol.
///
/// Non-trading quotes take no part in the join and symbols missing on either side are dropped.
/// Rows come back ordered by `rate_diff` (Binance minus Gate) descending; ties keep join order,
/// which follows the Binance input.
pub fn merge_funding_rates(binance: &[FundingQuote], gate: &[FundingQuote]) -> Vec<MergedQuote> {
    let gate_index = index_by_symbol(gate.iter().filter(|q| q.is_trading()), |q| &q.canonical_symbol);

    let mut merged: Vec<MergedQuote> = binance
        .iter()
        .filter(|q| q.is_trading())
        .flat_map(|b| {
            gate_index
                .get(b.canonical_symbol.as_str())
                .into_iter()
                .flatten()
                .map(move |g| MergedQuote::from_pair(b, g))
        })
        .collect();

    merged.sort_by(|a, b| b.rate_diff.total_cmp(&a.rate_diff));
    merged
}

/// Inner-join the two funding cadence tables on canonical symbol
pub fn merge_funding_intervals(binance: &[FundingInterval], gate: &[FundingInterval]) -> Vec<IntervalPair> {
    let gate_index = index_by_symbol(gate.iter(), |i| &i.canonical_symbol);

    binance
        .iter()
        .flat_map(|b| {
            gate_index
                .get(b.canonical_symbol.as_str())
                .into_iter()
                .flatten()
                .map(move |g| IntervalPair {
                    canonical_symbol: b.canonical_symbol.clone(),
                    binance_interval_secs: b.interval_secs,
                    gate_interval_secs: g.interval_secs,
                })
        })
        .collect()
}

/// Canonical symbols whose settlement cadence differs between the exchanges
pub fn interval_mismatches(pairs: &[IntervalPair]) -> Vec<String> {
    pairs
        .iter()
        .filter(|p| p.is_mismatch())
        .map(|p| p.canonical_symbol.clone())
        .collect()
}

fn index_by_symbol<'a, T: 'a>(
    rows: impl Iterator<Item = &'a T>,
    key: impl Fn(&'a T) -> &'a String,
) -> HashMap<&'a str, Vec<&'a T>> {
    let mut index: HashMap<&str, Vec<&T>> = HashMap::new();
    for row in rows {
        index.entry(key(row).as_str()).or_default().push(row);
    }
    index
}
