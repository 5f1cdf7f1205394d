//! 日线收盘价数据源适配器。

pub mod alphavantage;
pub mod yahoo;
