//! Funding rate source trait

use crate::{
    connectors::Exchange,
    data::{FundingInterval, FundingQuote, RateLookup},
    Result,
};
use async_trait::async_trait;

/// A futures exchange that publishes funding rates
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FundingRateSource: Send + Sync {
    /// Which exchange this source talks to
    fn exchange(&self) -> Exchange;

    /// All trading perpetual contracts, highest funding rate first.
    ///
    /// Transport, status and decoding failures are returned to the caller.
    async fn fetch_funding_rates(&self) -> Result<Vec<FundingQuote>>;

    /// Current funding rate of one contract.
    ///
    /// Never fails: a broken lookup yields [`RateLookup::Fallback`].
    async fn get_funding_rate(&self, symbol: &str) -> RateLookup;

    /// Settlement cadence of every trading perpetual contract
    async fn fetch_funding_intervals(&self) -> Result<Vec<FundingInterval>>;
}

/// Order quotes by funding rate, highest first, keeping input order on ties
pub fn sort_by_rate_desc(quotes: &mut [FundingQuote]) {
    quotes.sort_by(|a, b| b.funding_rate.total_cmp(&a.funding_rate));
}
