use config::{Config, ConfigError, Environment, File};
use pricewatch_core::config::AppConfig;

/// 配置文件名 (不含扩展名)，可通过 `PRICEWATCH_CONFIG` 覆盖
pub const DEFAULT_CONFIG_FILE: &str = "pricewatch";

/// 环境变量前缀，层级以 `__` 分隔，例如 `PRICEWATCH__WATCH__SYMBOL`
pub const ENV_PREFIX: &str = "PRICEWATCH";

/// # Summary
/// 构造读取 `PRICEWATCH__*` 环境变量的配置源。
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}

/// # Summary
/// 加载应用配置。
///
/// # Logic
/// 1. 读取可选的配置文件 (toml/yaml/json 均可)。
/// 2. 叠加环境变量，优先级最高。
/// 3. 未出现的字段取 `AppConfig::default()` 中的值。
///
/// # Arguments
/// * `file`: 配置文件路径 (可省略扩展名)，文件不存在时忽略。
/// * `env`: 环境变量配置源。
///
/// # Returns
/// 成功返回合并后的 `AppConfig`。
pub fn load(file: &str, env: Environment) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::with_name(file).required(false))
        .add_source(env)
        .build()?
        .try_deserialize()
}
