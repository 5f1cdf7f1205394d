use crate::{composer, decider, delta};
use chrono::NaiveDate;
use pricewatch_core::alert::entity::RunResult;
use pricewatch_core::alert::error::AlertError;
use pricewatch_core::common::TimeProvider;
use pricewatch_core::config::WatchConfig;
use pricewatch_core::market::entity::PriceReading;
use pricewatch_core::market::error::MarketError;
use pricewatch_core::market::port::PriceProvider;
use pricewatch_core::news::entity::Headline;
use pricewatch_core::news::port::NewsProvider;
use pricewatch_core::notify::port::Notifier;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 查找单个收盘价时最多回溯的自然日数 (覆盖周末与长假)
pub const MAX_LOOKBACK_DAYS: u32 = 7;

/// # Summary
/// 单次告警流水线，按固定顺序编排各外部协作者。
///
/// # Invariants
/// - 每次 `run` 线性执行：取价 → 计算涨跌 → 判定 → 取新闻 → 拼装 → 投递，任何阶段不会重入。
/// - 不持有跨运行的可变状态，相同的协作者应答必然得到相同结果。
/// - 新闻失败只降级为空列表，不影响告警投递。
pub struct Pipeline {
    // 收盘价数据源
    prices: Arc<dyn PriceProvider>,
    // 新闻数据源
    news: Arc<dyn NewsProvider>,
    // 通知投递端口
    notifier: Arc<dyn Notifier>,
    // 时钟，用于确定最近一个已收盘交易日
    clock: Arc<dyn TimeProvider>,
}

impl Pipeline {
    /// # Summary
    /// 创建流水线实例。
    ///
    /// # Arguments
    /// * `prices`: 收盘价提供者。
    /// * `news`: 新闻提供者。
    /// * `notifier`: 通知发送者。
    /// * `clock`: 时间供给器。
    pub fn new(
        prices: Arc<dyn PriceProvider>,
        news: Arc<dyn NewsProvider>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            prices,
            news,
            notifier,
            clock,
        }
    }

    /// # Summary
    /// 执行一次完整的告警流程。
    ///
    /// # Logic
    /// 1. 校验配置。
    /// 2. FETCH_PRICES：取最近两个交易日收盘价，缺失即失败。
    /// 3. EVALUATE_DELTA：计算涨跌。
    /// 4. DECIDE：未达阈值则以 `Skipped` 结束。
    /// 5. FETCH_NEWS：尽力获取新闻，失败时使用空列表。
    /// 6. COMPOSE：拼装正文。
    /// 7. DELIVER：投递，失败不重试。
    ///
    /// # Arguments
    /// * `config`: 本次运行的监控配置。
    ///
    /// # Returns
    /// 返回 `Sent`、`Skipped` 或携带具体原因的 `Failed`。
    pub async fn run(&self, config: &WatchConfig) -> RunResult {
        match self.execute(config).await {
            Ok(result) => result,
            Err(e) => {
                error!("Pipeline failed for {}: {}", config.symbol, e);
                RunResult::Failed(e)
            }
        }
    }

    async fn execute(&self, config: &WatchConfig) -> Result<RunResult, AlertError> {
        config.validate()?;
        let symbol = config.symbol.as_str();
        info!("Pipeline run started for {symbol}, threshold {}%", config.threshold_percent);

        let (prior, current) = self.fetch_prices(symbol).await?;
        info!(
            "{symbol} closes: {} on {}, {} on {}",
            prior.close, prior.date, current.close, current.date
        );

        let delta = delta::compute(&prior, &current)?;
        let decision = decider::evaluate(&delta, config.threshold_percent)?;
        if !decision.triggered {
            info!(
                "{symbol} moved {}% ({}), below threshold {}%; skipping",
                delta.percent_change.round_dp(composer::PERCENT_PRECISION),
                delta.direction,
                config.threshold_percent
            );
            return Ok(RunResult::Skipped(delta));
        }
        info!(
            "{symbol} moved {}% ({}), threshold {}% reached",
            delta.percent_change.round_dp(composer::PERCENT_PRECISION),
            delta.direction,
            config.threshold_percent
        );

        let headlines = self.fetch_news(config).await;
        let message = composer::compose(symbol, &delta, &headlines);

        self.notifier
            .send(&config.recipient, &message.body)
            .await
            .map_err(|e| AlertError::DeliveryFailed(e.to_string()))?;
        info!("Alert for {symbol} delivered with {} headline(s)", headlines.len());

        Ok(RunResult::Sent(delta))
    }

    /// # Summary
    /// 获取最近两个交易日的收盘价。
    ///
    /// # Logic
    /// 1. 以时钟当日的前一天作为最近一个已收盘日，向前寻找第一个有数据的交易日。
    /// 2. 从该交易日的前一天继续向前寻找前一交易日。
    ///
    /// # Returns
    /// 返回 `(prior, current)`；任一缺失返回 `DataUnavailable`。
    async fn fetch_prices(&self, symbol: &str) -> Result<(PriceReading, PriceReading), AlertError> {
        let last_closed = previous_day(self.clock.today())?;
        let current = self.find_close(symbol, last_closed).await?;
        let prior = self.find_close(symbol, previous_day(current.date)?).await?;
        Ok((prior, current))
    }

    async fn find_close(&self, symbol: &str, start: NaiveDate) -> Result<PriceReading, AlertError> {
        let mut date = start;
        for _ in 0..MAX_LOOKBACK_DAYS {
            match self.prices.get_close(symbol, date).await {
                Ok(reading) => return Ok(reading),
                Err(MarketError::NotFound) => debug!("No close for {symbol} on {date}, stepping back"),
                Err(e) => {
                    return Err(AlertError::DataUnavailable(format!(
                        "{symbol} on {date}: {e}"
                    )));
                }
            }
            date = previous_day(date)?;
        }

        Err(AlertError::DataUnavailable(format!(
            "no close for {symbol} within {MAX_LOOKBACK_DAYS} days up to {start}"
        )))
    }

    /// # Summary
    /// 尽力获取新闻。
    ///
    /// # Logic
    /// 1. 上限为 0 时不发起请求。
    /// 2. 请求失败或结果为空都记为 `NewsUnavailable` 并降级为空列表。
    /// 3. 超出上限的结果被截断。
    async fn fetch_news(&self, config: &WatchConfig) -> Vec<Headline> {
        let max_results = config.news_max_results;
        if max_results == 0 {
            return Vec::new();
        }

        match self.news.search(config.news_query(), max_results).await {
            Ok(mut headlines) => {
                if headlines.is_empty() {
                    warn!("{}", AlertError::NewsUnavailable("no headlines found".into()));
                }
                headlines.truncate(max_results);
                headlines
            }
            Err(e) => {
                warn!("{}; sending price alert without news", AlertError::NewsUnavailable(e.to_string()));
                Vec::new()
            }
        }
    }
}

fn previous_day(date: NaiveDate) -> Result<NaiveDate, AlertError> {
    date.pred_opt()
        .ok_or_else(|| AlertError::DataUnavailable(format!("no calendar day before {date}")))
}
