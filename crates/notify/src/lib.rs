//! Notifier adapters: Twilio SMS, Telegram Bot API and SMTP email.

pub mod email;
pub mod telegram;
pub mod twilio;
