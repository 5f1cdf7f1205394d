use crate::market::entity::PriceReading;
use crate::market::error::MarketError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// # Summary
/// 日线收盘价提供者接口（原始数据源）。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync`，以便通过 `Arc<dyn PriceProvider>` 注入。
/// - 同一 (symbol, date) 在数据源未变化时必须返回相同结果。
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// # Summary
    /// 获取指定证券在指定交易日的收盘价。
    ///
    /// # Logic
    /// 1. 向数据源请求覆盖该日期的日线数据。
    /// 2. 挑出日期完全匹配的那一根并转换为十进制价格。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `date`: 交易日。
    ///
    /// # Returns
    /// 成功返回 `PriceReading`；该日无数据返回 `MarketError::NotFound`。
    async fn get_close(&self, symbol: &str, date: NaiveDate) -> Result<PriceReading, MarketError>;
}
