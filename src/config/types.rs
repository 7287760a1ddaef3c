//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// Deepgram 配置（语音识别 + 语音合成）
    #[serde(default)]
    pub deepgram: DeepgramConfig,

    /// Gemini 配置（故事生成）
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            deepgram: DeepgramConfig::default(),
            gemini: GeminiConfig::default(),
            storage: StorageConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Deepgram 配置
///
/// STT（listen）与 TTS（speak）共用一个 API Key 和 Base URL
#[derive(Debug, Clone, Deserialize)]
pub struct DeepgramConfig {
    /// API Key（必填，通常由 DEEPGRAM_API_KEY 环境变量提供）
    #[serde(default)]
    pub api_key: Option<String>,

    /// API 基础 URL
    #[serde(default = "default_deepgram_base_url")]
    pub base_url: String,

    /// 语音识别模型
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// 转写结果是否添加标点
    #[serde(default = "default_punctuate")]
    pub punctuate: bool,

    /// 默认合成音色
    #[serde(default = "default_voice")]
    pub voice: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_deepgram_timeout")]
    pub timeout_secs: u64,
}

fn default_deepgram_base_url() -> String {
    "https://api.deepgram.com".to_string()
}

fn default_stt_model() -> String {
    "nova-3".to_string()
}

fn default_punctuate() -> bool {
    true
}

fn default_voice() -> String {
    "aura-asteria-en".to_string()
}

fn default_deepgram_timeout() -> u64 {
    60
}

impl Default for DeepgramConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_deepgram_base_url(),
            stt_model: default_stt_model(),
            punctuate: default_punctuate(),
            voice: default_voice(),
            timeout_secs: default_deepgram_timeout(),
        }
    }
}

/// Gemini 配置
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    /// API Key（必填，通常由 GEMINI_API_KEY / GOOGLE_API_KEY 环境变量提供）
    #[serde(default)]
    pub api_key: Option<String>,

    /// API 基础 URL
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// API 版本
    #[serde(default = "default_gemini_api_version")]
    pub api_version: String,

    /// 生成模型
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_gemini_timeout")]
    pub timeout_secs: u64,
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_api_version() -> String {
    "v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_timeout() -> u64 {
    120
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            api_version: default_gemini_api_version(),
            model: default_gemini_model(),
            timeout_secs: default_gemini_timeout(),
        }
    }
}

/// 存储配置
///
/// 两个目录都只存放请求生命周期内的瞬态文件
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 上传音频的临时目录
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// 合成音频的输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// 上传文件最大大小（字节），默认 10MB
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("data/scratch")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/output")
}

fn default_max_upload_size() -> u64 {
    10 * 1024 * 1024 // 10 MB
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            output_dir: default_output_dir(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.deepgram.base_url, "https://api.deepgram.com");
        assert_eq!(config.deepgram.stt_model, "nova-3");
        assert_eq!(config.deepgram.voice, "aura-asteria-en");
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert!(config.deepgram.api_key.is_none());
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_default_punctuate_enabled() {
        let config = DeepgramConfig::default();
        assert!(config.punctuate);
    }
}
