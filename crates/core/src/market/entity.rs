use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// # Summary
/// 单个交易日的收盘价读数。
///
/// # Invariants
/// - 获取后不可变，仅作为 `DeltaEvaluator` 的输入。
/// - `date` 为交易所所在日历日，不含时区信息。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceReading {
    // 证券代码 (例如: TSLA)
    pub symbol: String,
    // 交易日
    pub date: NaiveDate,
    // 收盘价
    pub close: Decimal,
}

impl PriceReading {
    pub fn new(symbol: impl Into<String>, date: NaiveDate, close: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            close,
        }
    }
}
