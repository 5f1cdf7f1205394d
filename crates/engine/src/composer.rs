use pricewatch_core::alert::entity::{AlertMessage, Direction, PriceDelta};
use pricewatch_core::news::entity::Headline;
use rust_decimal::RoundingStrategy;

/// 百分比保留的小数位数
pub const PERCENT_PRECISION: u32 = 2;

/// 方向对应的视觉提示符号
pub fn indicator(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "🔺",
        Direction::Down => "🔻",
        Direction::Flat => "➖",
    }
}

/// # Summary
/// 拼装告警正文。
///
/// # Logic
/// 1. 首行为 `{symbol}: {符号}{涨跌幅}%`，涨跌幅取绝对值并四舍五入到两位小数，方向由符号表达。
/// 2. 每条新闻按接收顺序追加为一个以空行分隔的段落：`Headline: ...` 与 `Brief: ...`。
///    标题原样保留，未以句末标点结尾时补一个句点。
/// 3. 无新闻时只保留首行。
///
/// # Arguments
/// * `symbol`: 证券代码。
/// * `delta`: 价格变动。
/// * `headlines`: 已排序的新闻。
///
/// # Returns
/// 返回 `AlertMessage`，长度不做限制。
pub fn compose(symbol: &str, delta: &PriceDelta, headlines: &[Headline]) -> AlertMessage {
    let percent = delta
        .percent_change
        .abs()
        .round_dp_with_strategy(PERCENT_PRECISION, RoundingStrategy::MidpointAwayFromZero);

    let mut body = format!("{}: {}{:.2}%", symbol, indicator(delta.direction), percent);

    for headline in headlines {
        let stop = if headline.title.ends_with(['.', '!', '?', '…']) {
            ""
        } else {
            "."
        };
        body.push_str(&format!(
            "\n\nHeadline: {}{}\nBrief: {}",
            headline.title, stop, headline.description
        ));
    }

    AlertMessage { body }
}
