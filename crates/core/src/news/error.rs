use thiserror::Error;

/// # Summary
/// 新闻服务错误枚举。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 新闻为尽力而为的附加信息，任何该类错误都不应导致告警流程失败。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NewsError {
    /// 网络连接或传输错误
    #[error("Network error: {0}")]
    Network(String),

    /// 响应解析错误
    #[error("Parse error: {0}")]
    Parse(String),

    /// 新闻平台返回的错误 (如 API Key 无效、配额用尽)
    #[error("Platform error: {0}")]
    Platform(String),
}
