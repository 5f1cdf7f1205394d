use pricewatch_core::alert::entity::{AlertDecision, PriceDelta};
use pricewatch_core::alert::error::AlertError;
use rust_decimal::Decimal;

/// # Summary
/// 依据阈值判定是否需要告警。
///
/// # Invariants
/// - 纯函数，相同输入恒得相同结论。
/// - 涨跌幅绝对值恰好等于阈值时视为触发 (`>=`)。
///
/// # Returns
/// 阈值不为正数时返回 `InvalidConfig`。
pub fn evaluate(delta: &PriceDelta, threshold_percent: Decimal) -> Result<AlertDecision, AlertError> {
    if threshold_percent <= Decimal::ZERO {
        return Err(AlertError::InvalidConfig(format!(
            "threshold must be positive, got {threshold_percent}"
        )));
    }

    Ok(AlertDecision {
        triggered: delta.percent_change.abs() >= threshold_percent,
        delta: *delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricewatch_core::alert::entity::Direction;
    use rust_decimal_macros::dec;

    fn delta(percent: Decimal) -> PriceDelta {
        PriceDelta {
            absolute_change: percent,
            percent_change: percent,
            direction: Direction::of(percent),
        }
    }

    #[test]
    fn test_boundary_triggers() {
        assert!(evaluate(&delta(dec!(10.0)), dec!(10.0)).unwrap().triggered);
        assert!(evaluate(&delta(dec!(-10.00)), dec!(10)).unwrap().triggered);
    }

    #[test]
    fn test_below_threshold_does_not_trigger() {
        let decision = evaluate(&delta(dec!(5.00)), dec!(10.0)).unwrap();
        assert!(!decision.triggered);
        assert_eq!(decision.delta, delta(dec!(5.00)));
        assert!(!evaluate(&delta(dec!(-9.9999)), dec!(10)).unwrap().triggered);
    }

    #[test]
    fn test_matches_absolute_comparison() {
        let thresholds = [dec!(0.5), dec!(1), dec!(2.5), dec!(10)];
        let moves = [dec!(-12), dec!(-2.5), dec!(-0.4), dec!(0), dec!(0.5), dec!(1.01), dec!(9.99)];
        for t in thresholds {
            for m in moves {
                let decision = evaluate(&delta(m), t).unwrap();
                assert_eq!(decision.triggered, m.abs() >= t, "move {m} threshold {t}");
            }
        }
    }

    #[test]
    fn test_non_positive_threshold_is_invalid_config() {
        assert!(matches!(
            evaluate(&delta(dec!(50)), Decimal::ZERO),
            Err(AlertError::InvalidConfig(_))
        ));
        assert!(matches!(
            evaluate(&delta(dec!(50)), dec!(-1)),
            Err(AlertError::InvalidConfig(_))
        ));
    }
}
