use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, info};

use super::Notifier;
use crate::config::TelegramConfig;
use crate::error::Result;

/// Sends reports to one fixed Telegram chat through the Bot API.
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            self.config.token
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        debug!(chat_id = %self.config.chat_id, "sending report");

        let payload = json!({
            "chat_id": self.config.chat_id,
            "text": message,
        });

        let response = self
            .client
            .post(self.send_message_url())
            .json(&payload)
            .send()
            .await?;

        if response.status().is_success() {
            info!(chat_id = %self.config.chat_id, "report delivered");
        } else {
            error!(status = %response.status(), "failed to deliver report");
        }

        Ok(())
    }
}
