//! Retell - 语音转故事服务
//!
//! 启动流程：
//! - 加载配置（环境变量 > 配置文件 > 默认值，API Key 缺失快速失败）
//! - 构造 Deepgram / Gemini 客户端并注入流水线
//! - 启动 HTTP 服务器（带优雅关闭）

use std::sync::Arc;

use retell::application::PipelineConfig;
use retell::config::{load_config, print_config};
use retell::infrastructure::adapters::{
    DeepgramSttClient, DeepgramSttClientConfig, DeepgramTtsClient, DeepgramTtsClientConfig,
    GeminiStoryClient, GeminiStoryClientConfig,
};
use retell::infrastructure::http::{AppState, HttpServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载 .env（缺失则忽略）
    dotenvy::dotenv().ok();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},retell={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));
    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    tracing::info!("Retell - 语音转故事服务");
    print_config(&config);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.storage.scratch_dir).await?;
    tokio::fs::create_dir_all(&config.storage.output_dir).await?;

    // API Key 已在 load_config 中校验过非空
    let deepgram_key = config.deepgram.api_key.clone().unwrap_or_default();
    let gemini_key = config.gemini.api_key.clone().unwrap_or_default();

    // 创建 Deepgram STT 客户端
    let stt_engine = Arc::new(DeepgramSttClient::new(DeepgramSttClientConfig {
        api_key: deepgram_key.clone(),
        base_url: config.deepgram.base_url.clone(),
        model: config.deepgram.stt_model.clone(),
        punctuate: config.deepgram.punctuate,
        timeout_secs: config.deepgram.timeout_secs,
    })?);

    // 创建 Gemini 故事生成客户端
    let story_engine = Arc::new(GeminiStoryClient::new(GeminiStoryClientConfig {
        api_key: gemini_key,
        base_url: config.gemini.base_url.clone(),
        api_version: config.gemini.api_version.clone(),
        model: config.gemini.model.clone(),
        timeout_secs: config.gemini.timeout_secs,
    })?);

    // 创建 Deepgram TTS 客户端
    let tts_engine = Arc::new(DeepgramTtsClient::new(DeepgramTtsClientConfig {
        api_key: deepgram_key,
        base_url: config.deepgram.base_url.clone(),
        timeout_secs: config.deepgram.timeout_secs,
    })?);

    // 创建流水线与 HTTP 服务器
    let state = AppState::new(
        stt_engine,
        story_engine,
        tts_engine,
        PipelineConfig {
            scratch_dir: config.storage.scratch_dir.clone(),
            output_dir: config.storage.output_dir.clone(),
            default_voice: config.deepgram.voice.clone(),
        },
    );

    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_max_upload_size(config.storage.max_upload_size);
    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
