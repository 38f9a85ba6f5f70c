//! Binance USDⓈ-M Futures funding rate connector

use super::{rest::{parse_decimal, RestClient}, sort_by_rate_desc, Exchange, FundingRateSource};
use crate::{
    config::{ConfigDefaults, ExchangeConfig},
    data::{FundingInterval, FundingQuote, QuoteStatus, RateLookup},
    AlertError, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

const PREMIUM_INDEX_PATH: &str = "/fapi/v1/premiumIndex";
const EXCHANGE_INFO_PATH: &str = "/fapi/v1/exchangeInfo";
const FUNDING_INFO_PATH: &str = "/fapi/v1/fundingInfo";
const PERPETUAL: &str = "PERPETUAL";
const API_KEY_HEADER: &str = "X-MBX-APIKEY";
const SECONDS_PER_HOUR: u64 = 3600;

/// Binance Futures connector
pub struct BinanceFuturesConnector {
    /// REST client
    rest_client: RestClient,
    /// Rate reported when a single-symbol lookup fails
    fallback_rate: f64,
}

impl BinanceFuturesConnector {
    /// Create new Binance Futures connector
    pub fn new(config: &ExchangeConfig, fallback_rate: f64) -> Result<Self> {
        Ok(Self {
            rest_client: RestClient::new(config, Some(API_KEY_HEADER))?,
            fallback_rate,
        })
    }

    /// Symbol metadata from the exchange info endpoint
    async fn get_contract_status(&self) -> Result<Vec<BinanceSymbolInfo>> {
        let info: BinanceExchangeInfo = self.rest_client.get_json(EXCHANGE_INFO_PATH, &[]).await?;
        Ok(info.symbols)
    }

    async fn get_mark_prices(&self) -> Result<Vec<BinancePremiumIndex>> {
        self.rest_client.get_json(PREMIUM_INDEX_PATH, &[]).await
    }

    async fn lookup_funding_rate(&self, symbol: &str) -> Result<f64> {
        let index: BinancePremiumIndex = self.rest_client
            .get_json(PREMIUM_INDEX_PATH, &[("symbol", symbol)])
            .await?;
        parse_decimal(&index.last_funding_rate, "lastFundingRate")
    }
}

/// Join mark prices with contract metadata into trading quotes.
///
/// Rows are dropped before any field is parsed when they are not `TRADING`, have no metadata,
/// are delivery contracts or have no scheduled settlement.
pub fn quotes_from_payload(
    marks: Vec<BinancePremiumIndex>,
    symbols: &[BinanceSymbolInfo],
) -> Result<Vec<FundingQuote>> {
    let metadata: HashMap<&str, &BinanceSymbolInfo> = symbols
        .iter()
        .map(|info| (info.symbol.as_str(), info))
        .collect();

    let mut quotes = Vec::with_capacity(marks.len());
    for mark in marks {
        let Some(info) = metadata.get(mark.symbol.as_str()) else {
            debug!("Skipping Binance contract {} without exchange info", mark.symbol);
            continue;
        };

        if info.contract_type.as_deref().map_or(false, |t| t != PERPETUAL) {
            debug!("Skipping non-perpetual Binance contract {}", mark.symbol);
            continue;
        }

        let status = QuoteStatus::from_exchange_status(&info.status);
        if status != QuoteStatus::Trading {
            debug!("Skipping Binance contract {} with status {}", mark.symbol, info.status);
            continue;
        }

        if mark.next_funding_time <= 0 {
            debug!("Skipping Binance contract {} without scheduled funding", mark.symbol);
            continue;
        }

        quotes.push(FundingQuote::new(
            Exchange::Binance,
            mark.symbol.as_str(),
            parse_decimal(&mark.mark_price, "markPrice")?,
            parse_decimal(&mark.last_funding_rate, "lastFundingRate")?,
            millis_to_utc(mark.next_funding_time)?,
            status,
        ));
    }

    Ok(quotes)
}

/// Funding cadence for every trading perpetual; unlisted symbols use the 8-hour default
pub fn intervals_from_payload(
    symbols: &[BinanceSymbolInfo],
    adjusted: &[BinanceFundingInfo],
) -> Vec<FundingInterval> {
    let overrides: HashMap<&str, u64> = adjusted
        .iter()
        .map(|info| (info.symbol.as_str(), info.funding_interval_hours))
        .collect();

    symbols
        .iter()
        .filter(|info| QuoteStatus::from_exchange_status(&info.status) == QuoteStatus::Trading)
        .filter(|info| info.contract_type.as_deref().map_or(true, |t| t == PERPETUAL))
        .map(|info| {
            let hours = overrides
                .get(info.symbol.as_str())
                .copied()
                .unwrap_or(ConfigDefaults::BINANCE_DEFAULT_INTERVAL_HOURS);
            FundingInterval::new(Exchange::Binance, info.symbol.as_str(), hours * SECONDS_PER_HOUR)
        })
        .collect()
}

fn millis_to_utc(millis: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| AlertError::DataParsing(format!("Invalid nextFundingTime: {}", millis)).into())
}

#[async_trait]
impl FundingRateSource for BinanceFuturesConnector {
    fn exchange(&self) -> Exchange {
        Exchange::Binance
    }

    async fn fetch_funding_rates(&self) -> Result<Vec<FundingQuote>> {
        let marks = self.get_mark_prices().await?;
        let symbols = self.get_contract_status().await?;

        let mut quotes: Vec<FundingQuote> = quotes_from_payload(marks, &symbols)?
            .into_iter()
            .filter(FundingQuote::is_trading)
            .collect();
        sort_by_rate_desc(&mut quotes);

        info!("Fetched {} trading Binance funding rates", quotes.len());
        Ok(quotes)
    }

    async fn get_funding_rate(&self, symbol: &str) -> RateLookup {
        match self.lookup_funding_rate(symbol).await {
            Ok(rate) => RateLookup::Quoted(rate),
            Err(e) => {
                warn!("[Binance FR] Failed to fetch funding rate for {}: {}", symbol, e);
                RateLookup::Fallback {
                    rate: self.fallback_rate,
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn fetch_funding_intervals(&self) -> Result<Vec<FundingInterval>> {
        let symbols = self.get_contract_status().await?;
        let adjusted: Vec<BinanceFundingInfo> = self.rest_client.get_json(FUNDING_INFO_PATH, &[]).await?;
        Ok(intervals_from_payload(&symbols, &adjusted))
    }
}

// REST response structures
/// One row of `/fapi/v1/premiumIndex`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinancePremiumIndex {
    /// Symbol
    pub symbol: String,
    /// Mark price
    pub mark_price: String,
    /// Funding rate applied at the next settlement
    pub last_funding_rate: String,
    /// Next settlement, epoch milliseconds
    pub next_funding_time: i64,
    /// Server time, epoch milliseconds
    #[serde(default)]
    pub time: i64,
}

#[derive(Debug, Deserialize)]
struct BinanceExchangeInfo {
    symbols: Vec<BinanceSymbolInfo>,
}

/// Contract metadata from `/fapi/v1/exchangeInfo`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceSymbolInfo {
    /// Symbol
    pub symbol: String,
    /// Trading status, e.g. `TRADING` or `SETTLING`
    pub status: String,
    /// `PERPETUAL`, `CURRENT_QUARTER`, ...
    #[serde(default)]
    pub contract_type: Option<String>,
}

/// Row of `/fapi/v1/fundingInfo` (symbols with a non-default cadence)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceFundingInfo {
    /// Symbol
    pub symbol: String,
    /// Settlement cadence in hours
    pub funding_interval_hours: u64,
}
