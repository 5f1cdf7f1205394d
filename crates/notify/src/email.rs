use async_trait::async_trait;
use lettre::message::{Message, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use pricewatch_core::notify::error::NotifyError;
use pricewatch_core::notify::port::Notifier;
use tracing::info;

/// Subject line used for every alert email.
pub const ALERT_SUBJECT: &str = "Price alert";

/// # Summary
/// A notifier implementation that sends messages via SMTP (e.g., Gmail, QQ Mail).
///
/// # Invariants
/// - Requires valid SMTP credentials and server configuration.
/// - The `AsyncSmtpTransport` is reused for multiple notifications.
/// - The recipient passed to `send` is an email address.
pub struct EmailNotifier {
    /// The asynchronous SMTP transport.
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    /// The sender's email address.
    from: String,
}

impl EmailNotifier {
    /// # Summary
    /// Creates a new `EmailNotifier`.
    ///
    /// # Logic
    /// 1. Sets up the SMTP credentials.
    /// 2. Configures the relay transport with TLS and authentication.
    ///
    /// # Arguments
    /// * `host` - The SMTP server host (e.g., "smtp.gmail.com").
    /// * `user` - The SMTP username (email address).
    /// * `pass` - The SMTP password or app-specific password.
    /// * `from` - The sender's email address.
    ///
    /// # Returns
    /// * A new instance of `EmailNotifier` or `NotifyError`.
    pub fn new(host: &str, user: &str, pass: &str, from: &str) -> Result<Self, NotifyError> {
        let creds = Credentials::new(user.to_string(), pass.to_string());

        // Use default submission port 587 with STARTTLS
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| NotifyError::Config(format!("Invalid SMTP host: {}", e)))?
            .credentials(creds)
            .build();

        Ok(Self {
            mailer,
            from: from.to_string(),
        })
    }
}

/// Builds the plain-text alert email.
fn build_message(from: &str, to: &str, body: &str) -> Result<Message, NotifyError> {
    Message::builder()
        .from(
            from.parse()
                .map_err(|e| NotifyError::Config(format!("Invalid from address: {}", e)))?,
        )
        .to(to
            .parse()
            .map_err(|e| NotifyError::Config(format!("Invalid to address: {}", e)))?)
        .subject(ALERT_SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| NotifyError::Platform(format!("Failed to build email: {}", e)))
}

#[async_trait]
impl Notifier for EmailNotifier {
    /// # Summary
    /// Sends the alert as an email.
    ///
    /// # Logic
    /// 1. Builds a plain-text message addressed to `recipient`.
    /// 2. Sends it using the configured SMTP transport.
    ///
    /// # Returns
    /// * `Ok(())` if the email was successfully sent.
    /// * `Err(NotifyError)` if an address is invalid or a network/SMTP error occurs.
    async fn send(&self, recipient: &str, body: &str) -> Result<(), NotifyError> {
        let email = build_message(&self.from, recipient, body)?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| NotifyError::Network(format!("SMTP error: {}", e)))?;

        info!("Alert email delivered to {recipient}");
        Ok(())
    }
}
