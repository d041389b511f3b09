use reqwest::Client;
use serde_json::json;

use crate::error::{Error, Result};

/// Thin client for the Telegram Bot API. The appeal flow and the bot's
/// replies both go through here so the token lives in one place.
#[derive(Clone)]
pub struct NotificationService {
    client: Client,
    bot_token: String,
    admin_chat_id: i64,
}

impl NotificationService {
    pub fn new(bot_token: String, admin_chat_id: i64) -> Self {
        Self {
            client: Client::new(),
            bot_token,
            admin_chat_id,
        }
    }

    /// Forward a blocked user's appeal to the operator chat. The reply
    /// instructions match what the bot's command parser accepts.
    pub async fn send_appeal(&self, user_id: i64, username: &str, message: &str) -> Result<()> {
        let text = format!(
            "Unblock Appeal from User: {} (ID: {})\n\n\
             Message: {}\n\n\
             Reply with 'yes {}' to unblock or 'no {}' to keep blocked.",
            username, user_id, message, user_id, user_id
        );
        self.send_message(self.admin_chat_id, &text).await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.bot_token
        );
        let body = json!({ "chat_id": chat_id, "text": text });

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Internal(format!(
                "Telegram API returned {}: {}",
                status, detail
            )));
        }
        Ok(())
    }
}
