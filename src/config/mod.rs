//! Configuration management module

pub mod settings;

pub use settings::*;

use crate::{AlertError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the alert system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Binance futures endpoint and credentials
    pub binance: ExchangeConfig,
    /// Gate futures endpoint and credentials
    pub gate: ExchangeConfig,
    /// Telegram delivery settings
    pub telegram: TelegramConfig,
    /// Polling and report settings
    #[serde(default)]
    pub alert: AlertSettings,
}

/// Per-exchange REST configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// REST API base URL
    pub rest_api_url: String,
    /// API key (public endpoints do not need it)
    #[serde(default)]
    pub api_key: String,
    /// Outbound proxy, e.g. `http://127.0.0.1:7890`
    #[serde(default)]
    pub proxy: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
    /// Bot token
    #[serde(default)]
    pub bot_token: String,
    /// Destination chat
    #[serde(default)]
    pub chat_id: String,
}

/// Alert loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    /// Seconds slept between two polling cycles
    pub poll_interval_secs: u64,
    /// Alert when the next settlement is closer than this many seconds
    pub alert_window_secs: u64,
    /// Entries per top/bottom section
    pub top_n: usize,
    /// Rate substituted when a single-symbol lookup fails
    pub fallback_rate: f64,
}

fn default_timeout_secs() -> u64 {
    ConfigDefaults::REQUEST_TIMEOUT_SECS
}

fn default_telegram_api_url() -> String {
    ConfigDefaults::TELEGRAM_API_URL.to_string()
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: ConfigDefaults::POLL_INTERVAL_SECS,
            alert_window_secs: ConfigDefaults::ALERT_WINDOW_SECS,
            top_n: ConfigDefaults::TOP_N,
            fallback_rate: ConfigDefaults::FALLBACK_FUNDING_RATE,
        }
    }
}

impl ExchangeConfig {
    fn with_url(rest_api_url: &str) -> Self {
        Self {
            rest_api_url: rest_api_url.to_string(),
            api_key: String::new(),
            proxy: None,
            timeout_secs: ConfigDefaults::REQUEST_TIMEOUT_SECS,
        }
    }

    fn expand_env_vars(&mut self) -> Result<()> {
        self.rest_api_url = EnvExpander::expand(&self.rest_api_url)?;
        self.api_key = EnvExpander::expand(&self.api_key)?;
        if let Some(proxy) = &self.proxy {
            let expanded = EnvExpander::expand(proxy)?;
            // An empty proxy variable means "connect directly"
            self.proxy = if expanded.is_empty() { None } else { Some(expanded) };
        }
        Ok(())
    }

    fn validate(&self, name: &str) -> Result<()> {
        ConfigValidator::validate_url(&self.rest_api_url, &format!("{} REST URL", name))?;
        if let Some(proxy) = &self.proxy {
            ConfigValidator::validate_url(proxy, &format!("{} proxy", name))?;
        }
        if self.timeout_secs == 0 {
            return Err(AlertError::Config(format!("{} timeout must be greater than 0", name)).into());
        }
        Ok(())
    }
}

impl TelegramConfig {
    /// Check that a message could actually be delivered
    pub fn validate_credentials(&self) -> Result<()> {
        if self.bot_token.is_empty() {
            return Err(AlertError::Config("Telegram bot token cannot be empty".to_string()).into());
        }
        if self.chat_id.is_empty() {
            return Err(AlertError::Config("Telegram chat id cannot be empty".to_string()).into());
        }
        Ok(())
    }
}

impl AlertConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| AlertError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: AlertConfig = toml::from_str(&content)
            .map_err(|e| AlertError::Config(format!("Failed to parse config: {}", e)))?;

        // Expand environment variables
        config.expand_env_vars()?;

        Ok(config)
    }

    /// Build configuration from defaults plus process environment
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.binance.api_key = env_or_empty("BINANCE_API_KEY");
        config.binance.proxy = env_non_empty("BINANCE_PROXY");
        config.gate.api_key = env_or_empty("GATE_API_KEY");
        config.gate.proxy = env_non_empty("GATE_PROXY");
        config.telegram.bot_token = env_or_empty("TELEGRAM_BOT_TOKEN");
        config.telegram.chat_id = env_or_empty("TELEGRAM_CHAT_ID");

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.binance.validate("Binance")?;
        self.gate.validate("Gate")?;
        ConfigValidator::validate_url(&self.telegram.api_url, "Telegram API URL")?;

        if self.alert.poll_interval_secs == 0 {
            return Err(AlertError::Config("Poll interval must be greater than 0".to_string()).into());
        }

        if self.alert.poll_interval_secs > ConfigDefaults::MAX_POLL_INTERVAL_SECS {
            return Err(AlertError::Config(format!(
                "Poll interval cannot exceed {} seconds",
                ConfigDefaults::MAX_POLL_INTERVAL_SECS
            )).into());
        }

        if self.alert.alert_window_secs == 0 {
            return Err(AlertError::Config("Alert window must be greater than 0".to_string()).into());
        }

        if self.alert.alert_window_secs > ConfigDefaults::MAX_ALERT_WINDOW_SECS {
            return Err(AlertError::Config(format!(
                "Alert window cannot exceed {} seconds",
                ConfigDefaults::MAX_ALERT_WINDOW_SECS
            )).into());
        }

        if self.alert.top_n == 0 {
            return Err(AlertError::Config("top_n must be greater than 0".to_string()).into());
        }

        ConfigValidator::validate_positive(self.alert.fallback_rate.abs(), "Fallback rate")?;

        Ok(())
    }

    /// Expand environment variables in configuration
    fn expand_env_vars(&mut self) -> Result<()> {
        self.binance.expand_env_vars()?;
        self.gate.expand_env_vars()?;
        self.telegram.api_url = EnvExpander::expand(&self.telegram.api_url)?;
        self.telegram.bot_token = EnvExpander::expand(&self.telegram.bot_token)?;
        self.telegram.chat_id = EnvExpander::expand(&self.telegram.chat_id)?;
        Ok(())
    }
}

fn env_or_empty(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            binance: ExchangeConfig::with_url(ConfigDefaults::BINANCE_REST_URL),
            gate: ExchangeConfig::with_url(ConfigDefaults::GATE_REST_URL),
            telegram: TelegramConfig {
                api_url: ConfigDefaults::TELEGRAM_API_URL.to_string(),
                bot_token: String::new(),
                chat_id: String::new(),
            },
            alert: AlertSettings::default(),
        }
    }
}
