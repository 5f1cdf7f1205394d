use pricewatch_core::alert::entity::{Direction, PriceDelta};
use pricewatch_core::alert::error::AlertError;
use pricewatch_core::market::entity::PriceReading;
use rust_decimal::Decimal;

/// # Summary
/// 计算两个相邻交易日收盘价之间的涨跌。
///
/// # Logic
/// 1. 校验两个读数属于同一证券，且 `prior` 早于 `current`。
/// 2. 前一收盘价为 0 时百分比无定义。
/// 3. 以十进制精确运算得出绝对变动、百分比变动与方向。
///
/// # Arguments
/// * `prior`: 前一交易日读数。
/// * `current`: 当前交易日读数。
///
/// # Returns
/// 成功返回 `PriceDelta`；输入不合法返回 `InvalidInput`，前收为 0 返回 `DivisionUndefined`。
pub fn compute(prior: &PriceReading, current: &PriceReading) -> Result<PriceDelta, AlertError> {
    if prior.symbol != current.symbol {
        return Err(AlertError::InvalidInput(format!(
            "symbol mismatch: prior {} vs current {}",
            prior.symbol, current.symbol
        )));
    }
    if prior.date >= current.date {
        return Err(AlertError::InvalidInput(format!(
            "prior date {} is not before current date {}",
            prior.date, current.date
        )));
    }
    if prior.close.is_zero() {
        return Err(AlertError::DivisionUndefined);
    }

    let absolute_change = current
        .close
        .checked_sub(prior.close)
        .ok_or_else(|| AlertError::InvalidInput("price difference overflows".into()))?;
    let percent_change = absolute_change
        .checked_div(prior.close)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| AlertError::InvalidInput("percentage change overflows".into()))?;

    Ok(PriceDelta {
        absolute_change,
        percent_change,
        direction: Direction::of(absolute_change),
    })
}
