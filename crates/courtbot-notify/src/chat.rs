//! Group-chat delivery via the club's chat HTTP gateway.
//!
//! The gateway routes by instance and token in the path
//! (`/waInstance{instance}/sendMessage/{token}`) and takes the target chat
//! and message in the JSON body.

use serde::Serialize;
use tracing::info;

use courtbot_core::config::ChatNotifyConfig;

use crate::error::{NotifyError, Result};

pub struct ChatNotifier {
    client: reqwest::Client,
    config: ChatNotifyConfig,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    #[serde(rename = "chatId")]
    chat_id: &'a str,
    message: &'a str,
}

impl ChatNotifier {
    pub fn new(config: ChatNotifyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/waInstance{}/sendMessage/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.instance_id,
            self.config.api_token
        )
    }

    /// Post `message` to the configured group chat.
    pub async fn send(&self, message: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.endpoint())
            .json(&SendMessage {
                chat_id: &self.config.chat_id,
                message,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Gateway {
                status: status.as_u16(),
                body,
            });
        }

        info!(chat_id = %self.config.chat_id, "report sent to group chat");
        Ok(())
    }
}
