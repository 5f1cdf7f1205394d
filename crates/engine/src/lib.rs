//! 价格告警决策流水线：涨跌计算、阈值判定、消息拼装与编排。

pub mod composer;
pub mod decider;
pub mod delta;
pub mod pipeline;

pub use pipeline::Pipeline;
