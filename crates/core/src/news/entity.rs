use serde::{Deserialize, Serialize};

/// # Summary
/// 单条新闻标题及摘要，原样取自新闻源。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    // 标题
    pub title: String,
    // 内容摘要
    pub description: String,
}

impl Headline {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}
