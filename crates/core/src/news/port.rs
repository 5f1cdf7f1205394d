use crate::news::entity::Headline;
use crate::news::error::NewsError;
use async_trait::async_trait;

/// # Summary
/// 新闻检索接口定义。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync`。
/// - 返回结果按数据源的相关度顺序排列，且长度不超过 `max_results`。
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// # Summary
    /// 按关键词检索最近的新闻。
    ///
    /// # Arguments
    /// * `query` - 检索关键词，通常为公司全称或证券代码。
    /// * `max_results` - 最多返回的条数。
    ///
    /// # Returns
    /// * 成功返回新闻列表 (可能为空)。
    /// * 失败返回 `Err(NewsError)`。
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Headline>, NewsError>;
}
