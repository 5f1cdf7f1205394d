use thiserror::Error;

/// # Summary
/// 行情数据域错误枚举，处理网络、解析及数据缺失等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - `NotFound` 专指请求日期无收盘数据 (休市、尚未收盘)，调用方可据此回溯前一日。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    // 网络层错误，包含底层 HTTP 客户端错误信息 (含超时)
    #[error("Network error: {0}")]
    Network(String),
    // 数据解析错误，如 JSON 格式不匹配或价格无法转换为十进制数
    #[error("Parse error: {0}")]
    Parse(String),
    // 请求的数据未找到 (该日无收盘价)
    #[error("Data not found")]
    NotFound,
    // 配置错误，如缺少 API Key 或 HTTP 客户端无法构建
    #[error("Config error: {0}")]
    Config(String),
    // 数据源返回的业务错误 (限流、无效代码等)
    #[error("Unknown error: {0}")]
    Unknown(String),
}
