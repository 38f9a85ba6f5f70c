//! Exchange connectors against mocked REST endpoints

use crate::{TestUtils, T1, T2};
use funding_rate_alert::{
    config::AlertConfig,
    connectors::{ConnectorFactory, Exchange},
    data::RateLookup,
};
use serde_json::json;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

async fn config_for(server: &MockServer) -> AlertConfig {
    let mut config = AlertConfig::default();
    config.binance.rest_api_url = server.uri();
    config.gate.rest_api_url = server.uri();
    config
}

#[tokio::test]
async fn test_binance_fetch_keeps_trading_perpetuals_sorted() {
    let server = MockServer::start().await;
    TestUtils::mount_binance(
        &server,
        vec![
            TestUtils::binance_mark("ETHUSDT", "0.00010000", T1),
            TestUtils::binance_mark("BTCUSDT", "0.00050000", T1),
            TestUtils::binance_mark("OLDUSDT", "0.00900000", T1),
            TestUtils::binance_mark("BTCUSDT_240628", "", 0),
        ],
        vec![
            TestUtils::binance_symbol("ETHUSDT", "TRADING"),
            TestUtils::binance_symbol("BTCUSDT", "TRADING"),
            TestUtils::binance_symbol("OLDUSDT", "SETTLING"),
            json!({"symbol": "BTCUSDT_240628", "status": "TRADING", "contractType": "CURRENT_QUARTER"}),
        ],
    )
    .await;

    let source = ConnectorFactory::create_source(Exchange::Binance, &config_for(&server).await).unwrap();
    let quotes = source.fetch_funding_rates().await.unwrap();

    let symbols: Vec<&str> = quotes.iter().map(|q| q.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["BTCUSDT", "ETHUSDT"]);
    assert_eq!(quotes[0].canonical_symbol, "BTCUSDT");
    assert_eq!(quotes[0].next_funding_time, TestUtils::instant(T1));
    assert!((quotes[0].funding_rate - 0.0005).abs() < 1e-12);
}

#[tokio::test]
async fn test_binance_sends_api_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fapi/v1/premiumIndex"))
        .and(header("X-MBX-APIKEY", "key-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fapi/v1/exchangeInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"symbols": []})))
        .mount(&server)
        .await;

    let mut config = config_for(&server).await;
    config.binance.api_key = "key-1".to_string();
    let source = ConnectorFactory::create_source(Exchange::Binance, &config).unwrap();

    assert!(source.fetch_funding_rates().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_binance_bulk_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fapi/v1/premiumIndex"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = ConnectorFactory::create_source(Exchange::Binance, &config_for(&server).await).unwrap();
    assert!(source.fetch_funding_rates().await.is_err());
}

#[tokio::test]
async fn test_binance_single_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fapi/v1/premiumIndex"))
        .and(query_param("symbol", "BTCUSDT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(TestUtils::binance_mark("BTCUSDT", "0.00012500", T1)))
        .mount(&server)
        .await;

    let source = ConnectorFactory::create_source(Exchange::Binance, &config_for(&server).await).unwrap();
    assert_eq!(source.get_funding_rate("BTCUSDT").await, RateLookup::Quoted(0.000125));
}

#[tokio::test]
async fn test_single_lookup_falls_back_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"code": -1121, "msg": "Invalid symbol."})))
        .mount(&server)
        .await;

    let config = config_for(&server).await;
    for exchange in [Exchange::Binance, Exchange::Gate] {
        let source = ConnectorFactory::create_source(exchange, &config).unwrap();
        let lookup = source.get_funding_rate("NOPE").await;
        assert!(lookup.is_fallback(), "{} should fall back", exchange);
        assert_eq!(lookup.rate(), 0.0001);
    }
}

#[tokio::test]
async fn test_gate_fetch_normalizes_and_sorts() {
    let server = MockServer::start().await;
    let mut delisting = TestUtils::gate_contract("LUNA_USDT", "0.003", T1);
    delisting["in_delisting"] = json!(true);
    TestUtils::mount_gate(
        &server,
        vec![
            TestUtils::gate_contract("ETH_USDT", "-0.0001", T1),
            TestUtils::gate_contract("BTC_USDT", "0.0002", T2),
            delisting,
        ],
    )
    .await;

    let source = ConnectorFactory::create_source(Exchange::Gate, &config_for(&server).await).unwrap();
    let quotes = source.fetch_funding_rates().await.unwrap();

    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].symbol, "BTC_USDT");
    assert_eq!(quotes[0].canonical_symbol, "BTCUSDT");
    assert_eq!(quotes[0].next_funding_time, TestUtils::instant(T2));
    assert_eq!(quotes[1].canonical_symbol, "ETHUSDT");
}

#[tokio::test]
async fn test_gate_single_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/futures/usdt/contracts/BTC_USDT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(TestUtils::gate_contract("BTC_USDT", "0.000075", T1)))
        .mount(&server)
        .await;

    let source = ConnectorFactory::create_source(Exchange::Gate, &config_for(&server).await).unwrap();
    assert_eq!(source.get_funding_rate("BTC_USDT").await, RateLookup::Quoted(0.000075));
}

#[tokio::test]
async fn test_funding_intervals() {
    let server = MockServer::start().await;
    TestUtils::mount_binance(
        &server,
        vec![],
        vec![
            TestUtils::binance_symbol("BTCUSDT", "TRADING"),
            TestUtils::binance_symbol("ETHUSDT", "TRADING"),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/fapi/v1/fundingInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"symbol": "ETHUSDT", "adjustedFundingRateCap": "0.02", "fundingIntervalHours": 4}
        ])))
        .mount(&server)
        .await;

    let source = ConnectorFactory::create_source(Exchange::Binance, &config_for(&server).await).unwrap();
    let intervals = source.fetch_funding_intervals().await.unwrap();

    let secs: Vec<(&str, u64)> = intervals.iter().map(|i| (i.symbol.as_str(), i.interval_secs)).collect();
    assert_eq!(secs, vec![("BTCUSDT", 28_800), ("ETHUSDT", 14_400)]);
}
