use crate::alert::error::AlertError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// # Summary
/// 价格变动方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    // 上涨
    Up,
    // 下跌
    Down,
    // 持平
    Flat,
}

impl Direction {
    /// 按变动量的符号确定方向。
    pub fn of(change: Decimal) -> Self {
        if change.is_zero() {
            Direction::Flat
        } else if change.is_sign_positive() {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Flat => write!(f, "flat"),
        }
    }
}

/// # Summary
/// 相邻两个交易日之间的价格变动，每次运行重新计算。
///
/// # Invariants
/// - `percent_change = absolute_change / prior_close × 100`。
/// - `direction` 与 `absolute_change` (亦即 `percent_change`) 的符号严格一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceDelta {
    // 绝对变动 (当前收盘 - 前一收盘)
    pub absolute_change: Decimal,
    // 带符号的百分比变动
    pub percent_change: Decimal,
    // 变动方向
    pub direction: Direction,
}

/// # Summary
/// 阈值判定结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertDecision {
    // 是否触发告警
    pub triggered: bool,
    // 判定所依据的价格变动
    pub delta: PriceDelta,
}

/// # Summary
/// 待投递的告警消息，仅在投递阶段短暂存在。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub body: String,
}

/// # Summary
/// 单次运行的终态。
///
/// # Invariants
/// - 每次运行有且仅有一个终态。
/// - `Failed` 永远携带具体的 `AlertError`，且不会是 `NewsUnavailable`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    // 告警已投递
    Sent(PriceDelta),
    // 未达阈值，正常跳过
    Skipped(PriceDelta),
    // 运行失败
    Failed(AlertError),
}

impl RunResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, RunResult::Failed(_))
    }
}
