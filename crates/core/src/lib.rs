//! pricewatch 领域核心：实体、错误、端口 (Port) 与配置。
//!
//! 所有外部协作者 (行情、新闻、通知、时钟) 都以 trait 形式定义于此，
//! 具体实现位于各自的适配器 crate 中，由 app 层注入。

pub mod alert {
    pub mod entity;
    pub mod error;
}

pub mod common;
pub mod config;

pub mod market {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod news {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod notify {
    pub mod error;
    pub mod port;
}

#[cfg(feature = "test-utils")]
pub mod testing;
