use async_trait::async_trait;
use pricewatch_core::notify::error::NotifyError;
use pricewatch_core::notify::port::Notifier;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

const API_BASE: &str = "https://api.telegram.org";

/// # Summary
/// A notifier implementation that sends messages via Telegram Bot API.
///
/// # Invariants
/// * `bot_token` must be valid.
/// * The recipient passed to `send` is a chat ID the bot can post to.
pub struct TelegramNotifier {
    /// The Bot API token.
    bot_token: String,
    /// The Bot API base URL.
    api_base: String,
    /// The HTTP client used for requests.
    client: Client,
}

/// # Summary
/// Payload structure for Telegram `sendMessage` API.
///
/// The body is sent as plain text: headlines routinely contain characters that
/// Telegram's Markdown parser rejects.
#[derive(Serialize)]
struct TelegramMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

impl TelegramNotifier {
    /// # Summary
    /// Creates a new `TelegramNotifier`.
    ///
    /// # Arguments
    /// * `bot_token` - The Telegram Bot API token.
    ///
    /// # Returns
    /// * A new instance, or `NotifyError::Config` if the HTTP client cannot be built.
    pub fn new(bot_token: String) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            bot_token,
            api_base: API_BASE.to_string(),
            client,
        })
    }

    #[cfg(test)]
    fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    /// # Summary
    /// Sends the alert body to the given Telegram chat.
    ///
    /// # Logic
    /// 1. Constructs the Telegram API URL.
    /// 2. Sends a POST request with the chat ID and body.
    /// 3. Checks the response status and returns success or failure.
    ///
    /// # Arguments
    /// * `recipient` - The target chat ID.
    /// * `body` - The message text.
    ///
    /// # Returns
    /// * `Ok(())` if the message was sent successfully.
    /// * `Err(NotifyError)` if a network error occurs or the API returns a non-success status.
    async fn send(&self, recipient: &str, body: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);

        let payload = TelegramMessage {
            chat_id: recipient,
            text: body,
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(NotifyError::Platform(format!(
                "Telegram API error: {}",
                error_text
            )));
        }

        info!("Telegram message delivered to chat {recipient}");
        Ok(())
    }
}
