//! 供测试使用的端口替身，需开启 `test-utils` feature。

use crate::market::entity::PriceReading;
use crate::market::error::MarketError;
use crate::market::port::PriceProvider;
use crate::news::entity::Headline;
use crate::news::error::NewsError;
use crate::news::port::NewsProvider;
use crate::notify::error::NotifyError;
use crate::notify::port::Notifier;
use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// # Summary
/// 内存行情源：按日期预置收盘价，未预置的日期返回 `NotFound`。
pub struct MockPriceProvider {
    closes: DashMap<NaiveDate, Decimal>,
    // 若设置，则所有请求都返回该错误
    failure: Option<MarketError>,
    calls: AtomicUsize,
}

impl MockPriceProvider {
    pub fn new() -> Self {
        Self {
            closes: DashMap::new(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: MarketError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    pub fn with_close(self, date: NaiveDate, close: Decimal) -> Self {
        self.closes.insert(date, close);
        self
    }

    /// 已发生的 `get_close` 调用次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockPriceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceProvider for MockPriceProvider {
    async fn get_close(&self, symbol: &str, date: NaiveDate) -> Result<PriceReading, MarketError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.closes
            .get(&date)
            .map(|close| PriceReading::new(symbol, date, *close))
            .ok_or(MarketError::NotFound)
    }
}

/// # Summary
/// 固定应答的新闻源，记录调用次数与最后一次的检索参数。
pub struct MockNewsProvider {
    response: Result<Vec<Headline>, NewsError>,
    calls: AtomicUsize,
    last_query: Mutex<Option<(String, usize)>>,
}

impl MockNewsProvider {
    pub fn with_headlines(headlines: Vec<Headline>) -> Self {
        Self {
            response: Ok(headlines),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn failing(error: NewsError) -> Self {
        Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<(String, usize)> {
        self.last_query
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl NewsProvider for MockNewsProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Headline>, NewsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_query
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some((query.to_string(), max_results));
        self.response.clone()
    }
}

/// # Summary
/// 记录所有投递内容的通知替身，可配置为投递失败。
pub struct MockNotifier {
    failure: Option<NotifyError>,
    sent: Mutex<Vec<(String, String)>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            failure: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: NotifyError) -> Self {
        Self {
            failure: Some(error),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// 成功投递的 (recipient, body) 列表
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, recipient: &str, body: &str) -> Result<(), NotifyError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((recipient.to_string(), body.to_string()));
        Ok(())
    }
}
