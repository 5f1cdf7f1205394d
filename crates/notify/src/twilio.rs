use async_trait::async_trait;
use pricewatch_core::notify::error::NotifyError;
use pricewatch_core::notify::port::Notifier;
use reqwest::Client;
use serde::Deserialize;
use std::borrow::Cow;
use std::time::Duration;
use tracing::{info, warn};

/// Twilio rejects message bodies longer than this many characters.
pub const MAX_SMS_CHARS: usize = 1600;

/// # Summary
/// A notifier implementation that sends SMS via the Twilio Messages REST API.
///
/// # Invariants
/// * `account_sid` / `auth_token` must belong to the same Twilio account.
/// * `from_number` must be a Twilio number owned by that account.
/// * Bodies above `MAX_SMS_CHARS` are cut on a character boundary before sending.
pub struct TwilioNotifier {
    /// The account SID, also used as the basic-auth user.
    account_sid: String,
    /// The account auth token.
    auth_token: String,
    /// The sending Twilio number in E.164 format.
    from_number: String,
    /// The HTTP client used for requests.
    client: Client,
}

/// # Summary
/// Subset of Twilio's message resource returned on success.
#[derive(Deserialize, Debug)]
struct TwilioMessage {
    sid: String,
    status: String,
}

/// # Summary
/// Twilio REST error payload.
#[derive(Deserialize, Debug)]
struct TwilioError {
    code: Option<i64>,
    message: String,
}

impl TwilioNotifier {
    /// # Summary
    /// Creates a new `TwilioNotifier`.
    ///
    /// # Arguments
    /// * `account_sid` - The Twilio account SID.
    /// * `auth_token` - The Twilio auth token.
    /// * `from_number` - The Twilio number messages are sent from.
    ///
    /// # Returns
    /// * A new instance, or `NotifyError::Config` if credentials are missing or the client cannot be built.
    pub fn new(account_sid: String, auth_token: String, from_number: String) -> Result<Self, NotifyError> {
        if account_sid.is_empty() || auth_token.is_empty() || from_number.is_empty() {
            return Err(NotifyError::Config(
                "Twilio account_sid, auth_token and from_number are required".into(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            account_sid,
            auth_token,
            from_number,
            client,
        })
    }
}

/// Cuts `body` to at most `MAX_SMS_CHARS` characters.
fn truncate_body(body: &str) -> Cow<'_, str> {
    match body.char_indices().nth(MAX_SMS_CHARS) {
        Some((cut, _)) => Cow::Owned(body[..cut].to_string()),
        None => Cow::Borrowed(body),
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    /// # Summary
    /// Sends the alert body as an SMS.
    ///
    /// # Logic
    /// 1. Truncates the body to the SMS length limit.
    /// 2. POSTs a form with `To`, `From` and `Body` using basic auth.
    /// 3. Maps Twilio error payloads to `NotifyError::Platform`.
    ///
    /// # Arguments
    /// * `recipient` - The destination phone number in E.164 format.
    /// * `body` - The message text.
    async fn send(&self, recipient: &str, body: &str) -> Result<(), NotifyError> {
        let text = truncate_body(body);
        if let Cow::Owned(_) = text {
            warn!("SMS body truncated to {MAX_SMS_CHARS} characters");
        }

        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", recipient),
                ("From", self.from_number.as_str()),
                ("Body", text.as_ref()),
            ])
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let reason = match serde_json::from_str::<TwilioError>(&error_text) {
                Ok(TwilioError {
                    code: Some(code),
                    message,
                }) => format!("{code} {message}"),
                Ok(TwilioError { message, .. }) => message,
                Err(_) => format!("HTTP {status}: {error_text}"),
            };
            return Err(NotifyError::Platform(format!("Twilio API error: {reason}")));
        }

        let message: TwilioMessage = response
            .json()
            .await
            .map_err(|e| NotifyError::Platform(format!("Unexpected Twilio response: {}", e.without_url())))?;
        info!("SMS {} to {recipient} accepted with status {}", message.sid, message.status);

        Ok(())
    }
}
