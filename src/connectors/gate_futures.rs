//! Gate.io USDT Futures funding rate connector

use super::{rest::{parse_decimal, RestClient}, sort_by_rate_desc, Exchange, FundingRateSource};
use crate::{
    config::ExchangeConfig,
    data::{FundingInterval, FundingQuote, QuoteStatus, RateLookup},
    AlertError, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::{info, warn};

const SETTLE: &str = "usdt";

/// Gate Futures connector
pub struct GateFuturesConnector {
    /// REST client
    rest_client: RestClient,
    /// Rate reported when a single-symbol lookup fails
    fallback_rate: f64,
}

impl GateFuturesConnector {
    /// Create new Gate Futures connector
    pub fn new(config: &ExchangeConfig, fallback_rate: f64) -> Result<Self> {
        Ok(Self {
            rest_client: RestClient::new(config, None)?,
            fallback_rate,
        })
    }

    async fn list_contracts(&self) -> Result<Vec<GateContract>> {
        let path = format!("/futures/{}/contracts", SETTLE);
        self.rest_client.get_json(&path, &[]).await
    }

    async fn lookup_funding_rate(&self, contract: &str) -> Result<f64> {
        let path = format!("/futures/{}/contracts/{}", SETTLE, contract);
        let contract: GateContract = self.rest_client.get_json(&path, &[]).await?;
        parse_decimal(&contract.funding_rate, "funding_rate")
    }
}

/// Convert Gate contracts into trading quotes.
///
/// Gate publishes no trading status, so a contract is trading unless it is being delisted.
/// Delisting contracts are dropped before any field is parsed.
pub fn quotes_from_contracts(contracts: &[GateContract]) -> Result<Vec<FundingQuote>> {
    contracts
        .iter()
        .filter(|c| !c.in_delisting)
        .map(|c| {
            Ok(FundingQuote::new(
                Exchange::Gate,
                c.name.as_str(),
                parse_decimal(&c.mark_price, "mark_price")?,
                parse_decimal(&c.funding_rate, "funding_rate")?,
                seconds_to_utc(c.funding_next_apply)?,
                QuoteStatus::Trading,
            ))
        })
        .collect()
}

/// Settlement cadence of every listed contract, in seconds
pub fn intervals_from_contracts(contracts: &[GateContract]) -> Vec<FundingInterval> {
    contracts
        .iter()
        .filter(|c| !c.in_delisting)
        .map(|c| FundingInterval::new(Exchange::Gate, c.name.as_str(), c.funding_interval))
        .collect()
}

fn seconds_to_utc(seconds: f64) -> Result<DateTime<Utc>> {
    if !seconds.is_finite() {
        return Err(AlertError::DataParsing(format!("Invalid funding_next_apply: {}", seconds)).into());
    }
    Utc.timestamp_opt(seconds.round() as i64, 0)
        .single()
        .ok_or_else(|| AlertError::DataParsing(format!("Invalid funding_next_apply: {}", seconds)).into())
}

#[async_trait]
impl FundingRateSource for GateFuturesConnector {
    fn exchange(&self) -> Exchange {
        Exchange::Gate
    }

    async fn fetch_funding_rates(&self) -> Result<Vec<FundingQuote>> {
        let contracts = self.list_contracts().await?;

        let mut quotes: Vec<FundingQuote> = quotes_from_contracts(&contracts)?
            .into_iter()
            .filter(FundingQuote::is_trading)
            .collect();
        sort_by_rate_desc(&mut quotes);

        info!("Fetched {} trading Gate funding rates", quotes.len());
        Ok(quotes)
    }

    async fn get_funding_rate(&self, symbol: &str) -> RateLookup {
        match self.lookup_funding_rate(symbol).await {
            Ok(rate) => RateLookup::Quoted(rate),
            Err(e) => {
                warn!("[Gate FR] Failed to fetch funding rate for {}: {}", symbol, e);
                RateLookup::Fallback {
                    rate: self.fallback_rate,
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn fetch_funding_intervals(&self) -> Result<Vec<FundingInterval>> {
        let contracts = self.list_contracts().await?;
        Ok(intervals_from_contracts(&contracts))
    }
}

// REST response structures
/// One contract from `/futures/usdt/contracts`
#[derive(Debug, Clone, Deserialize)]
pub struct GateContract {
    /// Contract name, e.g. `BTC_USDT`
    pub name: String,
    /// Mark price
    pub mark_price: String,
    /// Funding rate applied at the next settlement
    pub funding_rate: String,
    /// Next settlement, epoch seconds
    pub funding_next_apply: f64,
    /// Seconds between settlements
    #[serde(default)]
    pub funding_interval: u64,
    /// Contract is being delisted
    #[serde(default)]
    pub in_delisting: bool,
}
