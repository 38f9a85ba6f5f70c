//! Canonical symbol spelling used as the cross-exchange join key

use crate::connectors::Exchange;

/// Separator Gate places between base and quote asset
pub const GATE_SEPARATOR: char = '_';

/// Map an exchange-native symbol to its canonical form.
///
/// Binance already spells symbols as `BTCUSDT`; Gate's `BTC_USDT` loses the separator.
/// Both are upper-cased so casing never splits a join.
pub fn normalize(native: &str, exchange: Exchange) -> String {
    match exchange {
        Exchange::Binance => native.to_ascii_uppercase(),
        Exchange::Gate => native
            .chars()
            .filter(|c| *c != GATE_SEPARATOR)
            .map(|c| c.to_ascii_uppercase())
            .collect(),
    }
}
