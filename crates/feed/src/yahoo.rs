use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use pricewatch_core::market::entity::PriceReading;
use pricewatch_core::market::error::MarketError;
use pricewatch_core::market::port::PriceProvider;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// # Summary
/// Yahoo Finance 日线收盘价提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯，单次请求 10 秒超时。
/// - 日线时间戳为开盘时刻，取其 UTC 日期作为交易日。
#[derive(Clone)]
pub struct YahooProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
}

impl YahooProvider {
    /// # Summary
    /// 创建一个新的 YahooProvider 实例。
    ///
    /// # Logic
    /// 1. 配置 10 秒超时。
    /// 2. 设置伪装浏览器 Header (User-Agent) 以减少被拦截风险。
    /// 3. 初始化 reqwest 客户端。
    ///
    /// # Returns
    /// 成功返回 YahooProvider，客户端构建失败返回 `MarketError::Config`。
    pub fn new() -> Result<Self, MarketError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            ),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()
            .map_err(|e| MarketError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

/// # Summary
/// Yahoo API 响应顶层结构。
///
/// # Invariants
/// - 映射自 Yahoo v8 chart 接口。
#[derive(Deserialize, Debug)]
struct YahooResponse {
    chart: YahooChart,
}

/// # Summary
/// Yahoo API 图表数据部分。
#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

/// # Summary
/// Yahoo API 错误详情。
#[derive(Deserialize, Debug)]
struct YahooError {
    description: String,
}

/// # Summary
/// Yahoo API 单个时间序列结果。休市区间可能没有 `timestamp` 字段。
#[derive(Deserialize, Debug)]
struct YahooResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Deserialize, Debug)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

/// # Summary
/// Yahoo API 原始报价数据，仅保留收盘价。
#[derive(Deserialize, Debug)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// # Summary
/// 从 chart 响应中挑出指定交易日的收盘价。
///
/// # Logic
/// 1. 数据源报错直接返回 `Unknown`。
/// 2. 按下标对齐时间戳与收盘价，空值跳过。
/// 3. 时间戳的 UTC 日期等于目标日期即命中，否则 `NotFound`。
fn close_on(response: YahooResponse, date: NaiveDate) -> Result<Decimal, MarketError> {
    if let Some(err) = response.chart.error {
        return Err(MarketError::Unknown(err.description));
    }

    let result = response
        .chart
        .result
        .and_then(|mut results| results.pop())
        .ok_or(MarketError::NotFound)?;
    let quote = result
        .indicators
        .quote
        .first()
        .ok_or(MarketError::Parse("No quote data".into()))?;

    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(day) = DateTime::<Utc>::from_timestamp(ts, 0).map(|t| t.date_naive()) else {
            continue;
        };
        if day != date {
            continue;
        }
        if let Some(close) = quote.close.get(i).and_then(|x| *x) {
            return Decimal::from_f64(close)
                .map(|d| d.normalize())
                .ok_or_else(|| MarketError::Parse(format!("close {close} is not a finite number")));
        }
    }

    Err(MarketError::NotFound)
}

#[async_trait]
impl PriceProvider for YahooProvider {
    /// # Summary
    /// 从 Yahoo Finance 抓取指定交易日的收盘价。
    ///
    /// # Logic
    /// 1. 构建覆盖目标日期前后各一天的日线请求，避免时区边界遗漏。
    /// 2. 发起异步请求并解析嵌套的 JSON 数据。
    /// 3. 挑出日期匹配的一根 K 线的收盘价。
    async fn get_close(&self, symbol: &str, date: NaiveDate) -> Result<PriceReading, MarketError> {
        let start = date
            .checked_sub_days(Days::new(1))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| MarketError::Unknown(format!("date {date} out of range")))?
            .and_utc();
        let end = date
            .checked_add_days(Days::new(2))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| MarketError::Unknown(format!("date {date} out of range")))?
            .and_utc();

        let url = format!("{CHART_ENDPOINT}/{symbol}");
        debug!("Yahoo request {url} for {date}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.without_url().to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        let json: YahooResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.without_url().to_string()))?;

        let close = close_on(json, date)?;
        Ok(PriceReading::new(symbol, date, close))
    }
}
