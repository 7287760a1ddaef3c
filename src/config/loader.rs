//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Missing API key: {0} is not set")]
    MissingApiKey(&'static str),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `RETELL_`，层级分隔符 `__`；另支持约定俗成的
///    `DEEPGRAM_API_KEY` / `GEMINI_API_KEY` / `GOOGLE_API_KEY`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `RETELL_SERVER__HOST=127.0.0.1`
/// - `RETELL_SERVER__PORT=8080`
/// - `RETELL_DEEPGRAM__STT_MODEL=nova-2`
/// - `DEEPGRAM_API_KEY=xxxx`
///
/// # 返回
/// - `Ok(AppConfig)` - 成功加载的配置
/// - `Err(ConfigError)` - 加载或校验失败（API Key 缺失时快速失败）
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("deepgram.base_url", "https://api.deepgram.com")?
        .set_default("deepgram.stt_model", "nova-3")?
        .set_default("deepgram.punctuate", true)?
        .set_default("deepgram.voice", "aura-asteria-en")?
        .set_default("deepgram.timeout_secs", 60)?
        .set_default("gemini.base_url", "https://generativelanguage.googleapis.com")?
        .set_default("gemini.api_version", "v1beta")?
        .set_default("gemini.model", "gemini-2.5-flash")?
        .set_default("gemini.timeout_secs", 120)?
        .set_default("storage.scratch_dir", "data/scratch")?
        .set_default("storage.output_dir", "data/output")?
        .set_default("storage.max_upload_size", 10 * 1024 * 1024)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: RETELL_
    // 层级分隔符: __ (双下划线)
    // 例如: RETELL_DEEPGRAM__STT_MODEL=nova-2
    builder = builder.add_source(
        Environment::with_prefix("RETELL")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 合并约定俗成的 API Key 环境变量（覆盖配置文件中的值）
    apply_well_known_env(&mut app_config);

    // 7. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 合并约定俗成的 API Key 环境变量
///
/// 原始部署习惯直接设置 `DEEPGRAM_API_KEY` 等变量，不走 `RETELL_` 前缀
fn apply_well_known_env(config: &mut AppConfig) {
    if let Ok(key) = std::env::var("DEEPGRAM_API_KEY") {
        if !key.is_empty() {
            config.deepgram.api_key = Some(key);
        }
    }
    let gemini_key = std::env::var("GEMINI_API_KEY").or_else(|_| std::env::var("GOOGLE_API_KEY"));
    if let Ok(key) = gemini_key {
        if !key.is_empty() {
            config.gemini.api_key = Some(key);
        }
    }
}

/// 验证配置有效性
///
/// API Key 缺失时在启动阶段快速失败，而不是在首次请求时才暴露
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证端口范围
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    // 验证 API Key
    if config.deepgram.api_key.as_deref().unwrap_or("").is_empty() {
        return Err(ConfigError::MissingApiKey("DEEPGRAM_API_KEY"));
    }
    if config.gemini.api_key.as_deref().unwrap_or("").is_empty() {
        return Err(ConfigError::MissingApiKey("GEMINI_API_KEY"));
    }

    // 验证 Base URL
    if config.deepgram.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Deepgram base URL cannot be empty".to_string(),
        ));
    }
    if config.gemini.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Gemini base URL cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
///
/// API Key 只打印是否已设置，不打印内容
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Deepgram URL: {}", config.deepgram.base_url);
    tracing::info!("Deepgram API Key: {}", key_status(&config.deepgram.api_key));
    tracing::info!("STT Model: {}", config.deepgram.stt_model);
    tracing::info!("Default Voice: {}", config.deepgram.voice);
    tracing::info!("Gemini URL: {}", config.gemini.base_url);
    tracing::info!("Gemini API Key: {}", key_status(&config.gemini.api_key));
    tracing::info!("Gemini Model: {}", config.gemini.model);
    tracing::info!("Scratch Directory: {:?}", config.storage.scratch_dir);
    tracing::info!("Output Directory: {:?}", config.storage.output_dir);
    tracing::info!("Max Upload Size: {} bytes", config.storage.max_upload_size);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

fn key_status(key: &Option<String>) -> &'static str {
    match key.as_deref() {
        Some(k) if !k.is_empty() => "set",
        _ => "missing",
    }
}
