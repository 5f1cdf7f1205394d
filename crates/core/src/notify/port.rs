use crate::notify::error::NotifyError;
use async_trait::async_trait;

/// # Summary
/// 发送通知到外部系统的接口定义。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync`。
/// - 每次调用至多尝试投递一次，不做内部重试。
/// - 消息长度限制 (如短信截断) 由具体实现自行处理。
#[async_trait]
pub trait Notifier: Send + Sync {
    /// # Summary
    /// 向指定接收方发送一条消息。
    ///
    /// # Logic
    /// 1. 根据目标平台要求格式化消息。
    /// 2. 通过底层传输协议发送消息。
    /// 3. 返回成功或失败状态。
    ///
    /// # Arguments
    /// * `recipient` - 接收方 (手机号、Chat ID 或邮箱地址，取决于实现)。
    /// * `body` - 消息正文。
    ///
    /// # Returns
    /// * 成功返回 `Ok(())`。
    /// * 失败返回 `Err(NotifyError)`。
    async fn send(&self, recipient: &str, body: &str) -> Result<(), NotifyError>;
}
