use std::process::ExitCode;
use std::sync::Arc;

use pricewatch_core::alert::entity::RunResult;
use pricewatch_core::common::RealTimeProvider;
use pricewatch_core::config::{FeedConfig, FeedSource, LogConfig, NotifyChannel, NotifyConfig};
use pricewatch_core::market::error::MarketError;
use pricewatch_core::market::port::PriceProvider;
use pricewatch_core::notify::error::NotifyError;
use pricewatch_core::notify::port::Notifier;
use pricewatch_engine::Pipeline;
use pricewatch_feed::alphavantage::AlphaVantageProvider;
use pricewatch_feed::yahoo::YahooProvider;
use pricewatch_news::newsapi::NewsApiProvider;
use pricewatch_notify::email::EmailNotifier;
use pricewatch_notify::telegram::TelegramNotifier;
use pricewatch_notify::twilio::TwilioNotifier;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod settings;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体适配器并通过 Arc<dyn Trait> 注入 Pipeline，执行一次后退出。
///
/// # Logic
/// 1. 加载 .env 与配置。
/// 2. 初始化日志 (控制台 + 按日滚动文件)。
/// 3. 实例化行情、新闻、通知适配器。
/// 4. 运行一次流水线 (配置校验在流水线内完成)，按结果设置退出码 (失败为 1)。
#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // 1. 加载配置
    let config_file = std::env::var("PRICEWATCH_CONFIG")
        .unwrap_or_else(|_| settings::DEFAULT_CONFIG_FILE.to_string());
    let config = settings::load(&config_file, settings::environment())?;

    // 2. 初始化日志
    let _guard = init_tracing(&config.log)?;
    info!("pricewatch starting for {}", config.watch.symbol);

    if rustls::crypto::ring::default_provider().install_default().is_err() {
        warn!("TLS crypto provider was already installed");
    }

    // 3. 实例化基础设施层
    let prices = build_price_provider(&config.feed)?;
    let news = Arc::new(NewsApiProvider::new(config.news.api_key.clone())?);
    let notifier = build_notifier(&config.notify)?;

    // 4. 运行
    let pipeline = Pipeline::new(prices, news, notifier, Arc::new(RealTimeProvider));
    let result = pipeline.run(&config.watch).await;

    match &result {
        RunResult::Sent(delta) => info!(
            "Alert sent: {} moved {}%",
            config.watch.symbol,
            delta.percent_change.round_dp(2)
        ),
        RunResult::Skipped(delta) => info!(
            "No alert: {} moved {}%",
            config.watch.symbol,
            delta.percent_change.round_dp(2)
        ),
        RunResult::Failed(e) => error!("Run failed: {e}"),
    }

    Ok(if result.is_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// # Summary
/// 初始化全局日志：控制台输出加按日滚动的文件输出。
///
/// # Returns
/// 返回文件写入线程的守卫，须持有至进程结束以保证日志落盘。
fn init_tracing(log: &LogConfig) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log.level))?;

    let file_appender = tracing_appender::rolling::daily(&log.dir, "pricewatch.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()?;

    Ok(guard)
}

fn build_price_provider(feed: &FeedConfig) -> Result<Arc<dyn PriceProvider>, MarketError> {
    let provider: Arc<dyn PriceProvider> = match feed.source {
        FeedSource::Yahoo => Arc::new(YahooProvider::new()?),
        FeedSource::AlphaVantage => {
            let api_key = feed
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| MarketError::Config("feed.api_key is required for alphavantage".into()))?;
            Arc::new(AlphaVantageProvider::new(api_key)?)
        }
    };
    Ok(provider)
}

fn build_notifier(notify: &NotifyConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    let notifier: Arc<dyn Notifier> = match notify.channel {
        NotifyChannel::Twilio => Arc::new(TwilioNotifier::new(
            notify.twilio.account_sid.clone(),
            notify.twilio.auth_token.clone(),
            notify.twilio.from_number.clone(),
        )?),
        NotifyChannel::Telegram => Arc::new(TelegramNotifier::new(notify.telegram.bot_token.clone())?),
        NotifyChannel::Email => Arc::new(EmailNotifier::new(
            &notify.email.host,
            &notify.email.user,
            &notify.email.password,
            &notify.email.from,
        )?),
    };
    Ok(notifier)
}
