//! Shared REST plumbing for the exchange connectors

use crate::{config::ExchangeConfig, AlertError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Thin JSON-over-HTTP client bound to one exchange base URL
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestClient {
    /// Build a client honouring the configured timeout and proxy.
    ///
    /// When `api_key_header` is given and a key is configured, it is sent on every request.
    pub fn new(config: &ExchangeConfig, api_key_header: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs));

        if let (Some(header), false) = (api_key_header, config.api_key.is_empty()) {
            let name = HeaderName::from_bytes(header.as_bytes())
                .map_err(|e| AlertError::Config(format!("Invalid header name '{}': {}", header, e)))?;
            let value = HeaderValue::from_str(&config.api_key)
                .map_err(|e| AlertError::Config(format!("Invalid API key: {}", e)))?;
            let mut headers = HeaderMap::new();
            headers.insert(name, value);
            builder = builder.default_headers(headers);
        }

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| AlertError::Config(format!("Invalid proxy '{}': {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| AlertError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.rest_api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}{path}` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self.client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| AlertError::Connection(format!("HTTP request to {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            return Err(AlertError::Connection(
                format!("HTTP request to {} failed with status: {}", path, response.status())
            ).into());
        }

        let body = response
            .json::<T>()
            .await
            .map_err(|e| AlertError::DataParsing(format!("Failed to parse response from {}: {}", path, e)))?;

        Ok(body)
    }
}

/// Parse a decimal transmitted as a JSON string
pub fn parse_decimal(value: &str, field: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| AlertError::DataParsing(format!("Invalid {} '{}': {}", field, value, e)).into())
}
