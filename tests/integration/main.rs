//! Integration tests for the funding rate alert

mod test_config;
mod test_connectors;
mod test_telegram;

use chrono::{DateTime, TimeZone, Utc};
use funding_rate_alert::config::AlertConfig;
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// 2024-05-01 08:00:00 UTC
pub const T1: i64 = 1_714_550_400;
/// 2024-05-01 16:00:00 UTC
pub const T2: i64 = T1 + 8 * 3600;
/// 2024-05-02 00:00:00 UTC
pub const T3: i64 = T2 + 8 * 3600;

/// Test utilities for integration tests
pub struct TestUtils;

impl TestUtils {
    /// Configuration pointing every endpoint at local mock servers
    pub fn create_test_config(binance: &MockServer, gate: &MockServer, telegram: &MockServer) -> AlertConfig {
        let mut config = AlertConfig::default();
        config.binance.rest_api_url = binance.uri();
        config.gate.rest_api_url = gate.uri();
        config.telegram.api_url = telegram.uri();
        config.telegram.bot_token = "123:abc".to_string();
        config.telegram.chat_id = "42".to_string();
        config
    }

    pub fn instant(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    /// `/fapi/v1/premiumIndex` row
    pub fn binance_mark(symbol: &str, rate: &str, next_secs: i64) -> Value {
        json!({
            "symbol": symbol,
            "markPrice": "100.00000000",
            "indexPrice": "100.01000000",
            "lastFundingRate": rate,
            "interestRate": "0.00010000",
            "nextFundingTime": next_secs * 1000,
            "time": T1 * 1000 - 600_000
        })
    }

    /// `/fapi/v1/exchangeInfo` symbol entry
    pub fn binance_symbol(symbol: &str, status: &str) -> Value {
        json!({
            "symbol": symbol,
            "status": status,
            "contractType": "PERPETUAL",
            "quoteAsset": "USDT"
        })
    }

    /// `/futures/usdt/contracts` entry
    pub fn gate_contract(name: &str, rate: &str, next_secs: i64) -> Value {
        json!({
            "name": name,
            "type": "direct",
            "mark_price": "100.02",
            "funding_rate": rate,
            "funding_next_apply": next_secs as f64,
            "funding_interval": 28800,
            "in_delisting": false
        })
    }

    pub async fn mount_binance(server: &MockServer, marks: Vec<Value>, symbols: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/fapi/v1/premiumIndex"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(marks)))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fapi/v1/exchangeInfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "timezone": "UTC",
                "symbols": symbols
            })))
            .mount(server)
            .await;
    }

    pub async fn mount_gate(server: &MockServer, contracts: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/futures/usdt/contracts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(contracts)))
            .mount(server)
            .await;
    }
}
