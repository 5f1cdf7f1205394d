use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use pricewatch_core::market::entity::PriceReading;
use pricewatch_core::market::error::MarketError;
use pricewatch_core::market::port::PriceProvider;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const QUERY_ENDPOINT: &str = "https://www.alphavantage.co/query";

/// 按交易日排序的收盘价序列
type DailyCloses = BTreeMap<NaiveDate, Decimal>;

/// # Summary
/// Alpha Vantage `TIME_SERIES_DAILY` 收盘价提供者实现。
///
/// # Invariants
/// - 免费额度按调用次数计费，同一证券的日线序列在实例生命周期内只拉取一次。
/// - 缓存仅驻留内存，进程退出即丢弃。
#[derive(Clone)]
pub struct AlphaVantageProvider {
    // 内部使用的 HTTP 客户端
    client: Client,
    // API Key
    api_key: String,
    // 查询接口地址
    endpoint: String,
    // symbol -> 日线收盘价序列
    series: Arc<DashMap<String, Arc<DailyCloses>>>,
}

impl AlphaVantageProvider {
    /// # Summary
    /// 创建一个新的 AlphaVantageProvider 实例。
    ///
    /// # Arguments
    /// * `api_key`: Alpha Vantage API Key。
    ///
    /// # Returns
    /// 成功返回实例，客户端构建失败返回 `MarketError::Config`。
    pub fn new(api_key: impl Into<String>) -> Result<Self, MarketError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| MarketError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: QUERY_ENDPOINT.to_string(),
            series: Arc::new(DashMap::new()),
        })
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// 获取 (必要时拉取) 指定证券的日线序列
    async fn daily_closes(&self, symbol: &str) -> Result<Arc<DailyCloses>, MarketError> {
        if let Some(cached) = self.series.get(symbol) {
            return Ok(cached.clone());
        }

        debug!("Alpha Vantage request TIME_SERIES_DAILY for {symbol}");
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "compact"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.without_url().to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        let json: DailyResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.without_url().to_string()))?;

        let closes = Arc::new(parse_daily(json)?);
        info!("Alpha Vantage returned {} daily closes for {symbol}", closes.len());
        self.series.insert(symbol.to_string(), closes.clone());
        Ok(closes)
    }
}

/// # Summary
/// `TIME_SERIES_DAILY` 响应。
///
/// # Invariants
/// - 限流或参数错误时不返回序列，而是 `Note` / `Information` / `Error Message` 之一。
#[derive(Deserialize, Debug)]
struct DailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    series: Option<HashMap<String, DailyBar>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize, Debug)]
struct DailyBar {
    #[serde(rename = "4. close")]
    close: String,
}

fn parse_daily(response: DailyResponse) -> Result<DailyCloses, MarketError> {
    if let Some(msg) = response
        .error_message
        .or(response.note)
        .or(response.information)
    {
        return Err(MarketError::Unknown(msg));
    }

    let series = response
        .series
        .ok_or_else(|| MarketError::Parse("missing \"Time Series (Daily)\"".into()))?;

    series
        .into_iter()
        .map(|(day, bar)| {
            let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                .map_err(|e| MarketError::Parse(format!("bad date {day}: {e}")))?;
            let close = Decimal::from_str(bar.close.trim())
                .map_err(|e| MarketError::Parse(format!("bad close {} on {day}: {e}", bar.close)))?;
            Ok((date, close.normalize()))
        })
        .collect()
}

#[async_trait]
impl PriceProvider for AlphaVantageProvider {
    /// # Logic
    /// 1. 取得 (或复用缓存的) 日线序列。
    /// 2. 按日期精确查找，缺失返回 `NotFound`。
    async fn get_close(&self, symbol: &str, date: NaiveDate) -> Result<PriceReading, MarketError> {
        let closes = self.daily_closes(symbol).await?;
        closes
            .get(&date)
            .map(|close| PriceReading::new(symbol, date, *close))
            .ok_or(MarketError::NotFound)
    }
}
