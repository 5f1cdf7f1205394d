use thiserror::Error;

/// # Summary
/// 告警流程错误枚举，覆盖一次运行中所有可能的失败原因。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - `NewsUnavailable` 仅用于日志记录，流程会在本地恢复。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlertError {
    /// 两个价格读数的证券代码不一致或日期顺序错误
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 配置非法 (如阈值不为正数)
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// 前一交易日收盘价为 0，百分比无定义
    #[error("Percentage change undefined: prior close is zero")]
    DivisionUndefined,

    /// 无法获取所需日期的收盘价
    #[error("Price data unavailable: {0}")]
    DataUnavailable(String),

    /// 新闻获取失败
    #[error("News unavailable: {0}")]
    NewsUnavailable(String),

    /// 通知投递失败
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}
