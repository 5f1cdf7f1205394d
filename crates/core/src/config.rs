use crate::alert::error::AlertError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub watch: WatchConfig,
    pub feed: FeedConfig,
    pub news: NewsConfig,
    pub notify: NotifyConfig,
    pub log: LogConfig,
}

/// # Summary
/// 告警流程本身识别的全部配置项，显式传入 `Pipeline::run`。
///
/// # Invariants
/// - `threshold_percent` 必须大于 0。
/// - `symbol` 与 `recipient` 不能为空。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    // 监控的证券代码
    pub symbol: String,
    // 公司全称，用作新闻检索关键词；缺省时使用证券代码
    pub company_name: Option<String>,
    // 触发告警的最小涨跌幅 (百分比，例如 10.0 表示 10%)
    pub threshold_percent: Decimal,
    // 附带的新闻条数上限，0 表示不检索新闻
    pub news_max_results: usize,
    // 通知接收方
    pub recipient: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            symbol: "TSLA".to_string(),
            company_name: None,
            threshold_percent: Decimal::TEN,
            news_max_results: 3,
            recipient: String::new(),
        }
    }
}

impl WatchConfig {
    /// # Summary
    /// 校验配置合法性。
    ///
    /// # Returns
    /// 合法返回 `Ok(())`，否则返回 `AlertError::InvalidConfig`。
    pub fn validate(&self) -> Result<(), AlertError> {
        if self.symbol.trim().is_empty() {
            return Err(AlertError::InvalidConfig("symbol must not be empty".into()));
        }
        if self.recipient.trim().is_empty() {
            return Err(AlertError::InvalidConfig("recipient must not be empty".into()));
        }
        if self.threshold_percent <= Decimal::ZERO {
            return Err(AlertError::InvalidConfig(format!(
                "threshold_percent must be positive, got {}",
                self.threshold_percent
            )));
        }
        Ok(())
    }

    /// 新闻检索关键词：优先公司全称，否则证券代码。
    pub fn news_query(&self) -> &str {
        match self.company_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.symbol,
        }
    }
}

/// 行情数据源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    #[default]
    Yahoo,
    AlphaVantage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub source: FeedSource,
    // Alpha Vantage 需要的 API Key
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    // NewsAPI 的 API Key
    pub api_key: String,
}

/// 通知渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyChannel {
    #[default]
    Twilio,
    Telegram,
    Email,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub channel: NotifyChannel,
    pub twilio: TwilioConfig,
    pub telegram: TelegramConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    // Twilio 分配的虚拟号码
    pub from_number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    // 滚动日志目录
    pub dir: String,
    // 缺省日志级别 (RUST_LOG 优先)
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: "logs".to_string(),
            level: "info".to_string(),
        }
    }
}
