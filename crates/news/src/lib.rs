//! 新闻检索适配器。

pub mod newsapi;
