use chrono::{NaiveDate, TimeZone, Utc};
use pricewatch_core::alert::entity::{Direction, RunResult};
use pricewatch_core::alert::error::AlertError;
use pricewatch_core::common::FakeClockProvider;
use pricewatch_core::config::WatchConfig;
use pricewatch_core::market::error::MarketError;
use pricewatch_core::news::entity::Headline;
use pricewatch_core::news::error::NewsError;
use pricewatch_core::notify::error::NotifyError;
use pricewatch_core::testing::{MockNewsProvider, MockNotifier, MockPriceProvider};
use pricewatch_engine::Pipeline;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

/// 2024-03-13 (周三) 上午运行，最近已收盘日为 03-12，前一交易日为 03-11。
fn clock() -> Arc<FakeClockProvider> {
    Arc::new(FakeClockProvider::new(
        Utc.with_ymd_and_hms(2024, 3, 13, 9, 0, 0).unwrap(),
    ))
}

fn prices(prior: Decimal, current: Decimal) -> MockPriceProvider {
    MockPriceProvider::new()
        .with_close(day(11), prior)
        .with_close(day(12), current)
}

fn config(threshold: Decimal) -> WatchConfig {
    WatchConfig {
        symbol: "TSLA".to_string(),
        company_name: Some("Tesla Inc".to_string()),
        threshold_percent: threshold,
        news_max_results: 3,
        recipient: "+15550001111".to_string(),
    }
}

fn headlines() -> Vec<Headline> {
    vec![
        Headline::new("Tesla shares surge", "Deliveries beat expectations."),
        Headline::new("Analysts raise targets", "Several banks lifted price targets."),
    ]
}

#[tokio::test]
async fn test_scenario_a_ten_percent_rise_is_sent() {
    let news = Arc::new(MockNewsProvider::with_headlines(headlines()));
    let notifier = Arc::new(MockNotifier::new());
    let pipeline = Pipeline::new(
        Arc::new(prices(dec!(100.00), dec!(110.00))),
        news.clone(),
        notifier.clone(),
        clock(),
    );

    let result = pipeline.run(&config(dec!(10.0))).await;

    let RunResult::Sent(delta) = result else {
        panic!("expected Sent, got {result:?}");
    };
    assert_eq!(delta.percent_change, dec!(10.00));
    assert_eq!(delta.direction, Direction::Up);

    assert_eq!(news.calls(), 1);
    assert_eq!(news.last_query(), Some(("Tesla Inc".to_string(), 3)));

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "+15550001111");
    assert!(sent[0].1.starts_with("TSLA: 🔺10.00%"));
    assert!(sent[0].1.contains("Headline: Tesla shares surge.\nBrief: Deliveries beat expectations."));
    assert!(sent[0].1.contains("Headline: Analysts raise targets."));
}

#[tokio::test]
async fn test_scenario_b_below_threshold_is_skipped_without_news() {
    let news = Arc::new(MockNewsProvider::with_headlines(headlines()));
    let notifier = Arc::new(MockNotifier::new());
    let pipeline = Pipeline::new(
        Arc::new(prices(dec!(100.00), dec!(105.00))),
        news.clone(),
        notifier.clone(),
        clock(),
    );

    let result = pipeline.run(&config(dec!(10.0))).await;

    let RunResult::Skipped(delta) = result else {
        panic!("expected Skipped, got {result:?}");
    };
    assert_eq!(delta.percent_change, dec!(5.00));
    assert_eq!(news.calls(), 0);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_scenario_c_zero_prior_close_fails() {
    let notifier = Arc::new(MockNotifier::new());
    let pipeline = Pipeline::new(
        Arc::new(prices(dec!(0.00), dec!(10.00))),
        Arc::new(MockNewsProvider::with_headlines(headlines())),
        notifier.clone(),
        clock(),
    );

    let result = pipeline.run(&config(dec!(10.0))).await;

    assert_eq!(result, RunResult::Failed(AlertError::DivisionUndefined));
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_scenario_d_news_failure_still_sends() {
    let notifier = Arc::new(MockNotifier::new());
    let pipeline = Pipeline::new(
        Arc::new(prices(dec!(100.00), dec!(88.00))),
        Arc::new(MockNewsProvider::failing(NewsError::Network("timeout".into()))),
        notifier.clone(),
        clock(),
    );

    let result = pipeline.run(&config(dec!(10.0))).await;

    assert!(matches!(result, RunResult::Sent(_)));
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, "TSLA: 🔻12.00%");
}

#[tokio::test]
async fn test_scenario_e_delivery_failure_carries_reason() {
    let pipeline = Pipeline::new(
        Arc::new(prices(dec!(100.00), dec!(110.00))),
        Arc::new(MockNewsProvider::with_headlines(headlines())),
        Arc::new(MockNotifier::failing(NotifyError::Platform(
            "Twilio API error: 21211 invalid 'To' number".into(),
        ))),
        clock(),
    );

    let result = pipeline.run(&config(dec!(10.0))).await;

    let RunResult::Failed(AlertError::DeliveryFailed(reason)) = result else {
        panic!("expected DeliveryFailed, got {result:?}");
    };
    assert!(reason.contains("21211 invalid 'To' number"));
}

#[tokio::test]
async fn test_identical_responses_give_identical_results() -> anyhow::Result<()> {
    let notifier = Arc::new(MockNotifier::new());
    let pipeline = Pipeline::new(
        Arc::new(prices(dec!(250.00), dec!(200.00))),
        Arc::new(MockNewsProvider::with_headlines(headlines())),
        notifier.clone(),
        clock(),
    );
    let config = config(dec!(10.0));

    let first = pipeline.run(&config).await;
    let second = pipeline.run(&config).await;

    assert_eq!(first, second);
    let sent = notifier.sent();
    anyhow::ensure!(sent.len() == 2, "expected two deliveries, got {}", sent.len());
    assert_eq!(sent[0], sent[1]);
    Ok(())
}

#[tokio::test]
async fn test_weekend_is_skipped_when_resolving_trading_days() {
    // 周二运行：最近收盘日为周一 03-11，前一交易日跳过周末落在周五 03-08
    let prices = Arc::new(
        MockPriceProvider::new()
            .with_close(day(8), dec!(100))
            .with_close(day(11), dec!(120)),
    );
    let notifier = Arc::new(MockNotifier::new());
    let pipeline = Pipeline::new(
        prices.clone(),
        Arc::new(MockNewsProvider::with_headlines(vec![])),
        notifier.clone(),
        Arc::new(FakeClockProvider::new(
            Utc.with_ymd_and_hms(2024, 3, 12, 6, 30, 0).unwrap(),
        )),
    );

    let result = pipeline.run(&config(dec!(10.0))).await;

    let RunResult::Sent(delta) = result else {
        panic!("expected Sent, got {result:?}");
    };
    assert_eq!(delta.percent_change, dec!(20));
    // 03-11 一次命中，之后 03-10、03-09 未命中，03-08 命中
    assert_eq!(prices.calls(), 4);
    assert_eq!(notifier.sent()[0].1, "TSLA: 🔺20.00%");
}

#[tokio::test]
async fn test_clock_advancing_over_weekend() {
    // 周五 03-08 收 110，周一 03-11 收 99
    let prices = Arc::new(
        MockPriceProvider::new()
            .with_close(day(7), dec!(100))
            .with_close(day(8), dec!(110))
            .with_close(day(11), dec!(99)),
    );
    let notifier = Arc::new(MockNotifier::new());
    let clock = Arc::new(FakeClockProvider::new(
        Utc.with_ymd_and_hms(2024, 3, 9, 9, 0, 0).unwrap(),
    ));
    let pipeline = Pipeline::new(
        prices.clone(),
        Arc::new(MockNewsProvider::with_headlines(vec![])),
        notifier.clone(),
        clock.clone(),
    );
    let watch = config(dec!(10));

    // 周六：比较周四与周五
    let saturday = pipeline.run(&watch).await;
    assert!(matches!(&saturday, RunResult::Sent(d) if d.percent_change == dec!(10)));

    // 周一早上：周末无数据，仍落在周四与周五
    clock.set_time(Utc.with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap());
    let monday = pipeline.run(&watch).await;
    assert_eq!(monday, saturday);

    // 周二：比较周五与周一
    clock.set_time(Utc.with_ymd_and_hms(2024, 3, 12, 9, 0, 0).unwrap());
    let tuesday = pipeline.run(&watch).await;
    let RunResult::Sent(delta) = tuesday else {
        panic!("expected Sent, got {tuesday:?}");
    };
    assert_eq!(delta.percent_change, dec!(-10));
    assert_eq!(delta.direction, Direction::Down);

    let bodies: Vec<String> = notifier.sent().into_iter().map(|(_, body)| body).collect();
    assert_eq!(bodies, vec!["TSLA: 🔺10.00%", "TSLA: 🔺10.00%", "TSLA: 🔻10.00%"]);
}

#[tokio::test]
async fn test_missing_prior_close_is_data_unavailable() {
    let prices = Arc::new(MockPriceProvider::new().with_close(day(12), dec!(110)));
    let pipeline = Pipeline::new(
        prices.clone(),
        Arc::new(MockNewsProvider::with_headlines(headlines())),
        Arc::new(MockNotifier::new()),
        clock(),
    );

    let result = pipeline.run(&config(dec!(10.0))).await;

    assert!(matches!(result, RunResult::Failed(AlertError::DataUnavailable(_))));
    assert_eq!(prices.calls(), 1 + pricewatch_engine::pipeline::MAX_LOOKBACK_DAYS as usize);
}

#[tokio::test]
async fn test_provider_error_is_data_unavailable() {
    let pipeline = Pipeline::new(
        Arc::new(MockPriceProvider::failing(MarketError::Network("HTTP 503".into()))),
        Arc::new(MockNewsProvider::with_headlines(headlines())),
        Arc::new(MockNotifier::new()),
        clock(),
    );

    let result = pipeline.run(&config(dec!(10.0))).await;

    let RunResult::Failed(AlertError::DataUnavailable(reason)) = result else {
        panic!("expected DataUnavailable, got {result:?}");
    };
    assert!(reason.contains("HTTP 503"));
}

#[tokio::test]
async fn test_invalid_threshold_fails_before_fetching() {
    let prices = Arc::new(prices(dec!(100), dec!(150)));
    let pipeline = Pipeline::new(
        prices.clone(),
        Arc::new(MockNewsProvider::with_headlines(headlines())),
        Arc::new(MockNotifier::new()),
        clock(),
    );

    let result = pipeline.run(&config(Decimal::ZERO)).await;

    assert!(matches!(result, RunResult::Failed(AlertError::InvalidConfig(_))));
    assert_eq!(prices.calls(), 0);
}

#[tokio::test]
async fn test_headlines_bounded_by_max_results() {
    let many = (1..=5)
        .map(|i| Headline::new(format!("Story {i}"), format!("Details {i}")))
        .collect::<Vec<_>>();
    let news = Arc::new(MockNewsProvider::with_headlines(many));
    let notifier = Arc::new(MockNotifier::new());
    let pipeline = Pipeline::new(
        Arc::new(prices(dec!(100), dec!(115))),
        news.clone(),
        notifier.clone(),
        clock(),
    );
    let mut config = config(dec!(10.0));
    config.news_max_results = 2;
    config.company_name = None;

    let result = pipeline.run(&config).await;

    assert!(matches!(result, RunResult::Sent(_)));
    assert_eq!(news.last_query(), Some(("TSLA".to_string(), 2)));
    let body = &notifier.sent()[0].1;
    assert!(body.contains("Story 1") && body.contains("Story 2"));
    assert!(!body.contains("Story 3"));
}

#[tokio::test]
async fn test_zero_max_results_skips_news_call() {
    let news = Arc::new(MockNewsProvider::with_headlines(headlines()));
    let notifier = Arc::new(MockNotifier::new());
    let pipeline = Pipeline::new(
        Arc::new(prices(dec!(100), dec!(90))),
        news.clone(),
        notifier.clone(),
        clock(),
    );
    let mut config = config(dec!(10.0));
    config.news_max_results = 0;

    let result = pipeline.run(&config).await;

    assert!(matches!(result, RunResult::Sent(_)));
    assert_eq!(news.calls(), 0);
    assert_eq!(notifier.sent()[0].1, "TSLA: 🔻10.00%");
}
