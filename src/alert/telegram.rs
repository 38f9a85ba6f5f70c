//! Telegram bot delivery

use crate::{config::TelegramConfig, AlertError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

const PARSE_MODE: &str = "Markdown";
const SEND_TIMEOUT_SECS: u64 = 10;

/// Delivers alert text somewhere a human will read it
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message; any failure is returned, never retried here
    async fn send(&self, text: &str) -> Result<()>;
}

/// Sends messages through the Telegram Bot API
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a notifier for one bot and chat
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .map_err(|e| AlertError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let params = [
            ("chat_id", self.chat_id.as_str()),
            ("text", text),
            ("parse_mode", PARSE_MODE),
        ];

        // reqwest errors can carry the URL, which embeds the bot token
        let response = self.client
            .post(self.send_message_url())
            .form(&params)
            .send()
            .await
            .map_err(|e| AlertError::Delivery(format!("Telegram request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AlertError::Delivery(
                format!("Telegram returned status {}: {}", status, body)
            ).into());
        }

        info!("✅ Message sent to chat {}", self.chat_id);
        Ok(())
    }
}
