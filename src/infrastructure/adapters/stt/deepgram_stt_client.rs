//! Deepgram STT Client - 调用 Deepgram 语音识别 API
//!
//! 实现 SttEnginePort trait
//!
//! 外部 API:
//! POST {base_url}/v1/listen?model={model}&punctuate={bool}
//! Request: 原始音频字节
//! Response: JSON，转写文本位于 results.channels[0].alternatives[0].transcript

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{SttEnginePort, SttError, Transcript};

/// Deepgram STT 客户端配置
#[derive(Debug, Clone)]
pub struct DeepgramSttClientConfig {
    /// API Key
    pub api_key: String,
    /// API 基础 URL
    pub base_url: String,
    /// 识别模型
    pub model: String,
    /// 转写结果是否添加标点
    pub punctuate: bool,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for DeepgramSttClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.deepgram.com".to_string(),
            model: "nova-3".to_string(),
            punctuate: true,
            timeout_secs: 60,
        }
    }
}

/// Deepgram listen 响应结构
///
/// 只反序列化用到的字段
#[derive(Debug, Deserialize)]
struct ListenResponse {
    results: Option<ListenResults>,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    #[serde(default)]
    channels: Vec<ListenChannel>,
}

#[derive(Debug, Deserialize)]
struct ListenChannel {
    #[serde(default)]
    alternatives: Vec<ListenAlternative>,
}

#[derive(Debug, Deserialize)]
struct ListenAlternative {
    transcript: String,
    confidence: Option<f64>,
}

/// Deepgram STT 客户端
pub struct DeepgramSttClient {
    client: Client,
    config: DeepgramSttClientConfig,
}

impl DeepgramSttClient {
    /// 创建新的 STT 客户端
    pub fn new(config: DeepgramSttClientConfig) -> Result<Self, SttError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SttError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn listen_url(&self) -> String {
        format!("{}/v1/listen", self.config.base_url)
    }
}

#[async_trait]
impl SttEnginePort for DeepgramSttClient {
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcript, SttError> {
        tracing::debug!(
            url = %self.listen_url(),
            model = %self.config.model,
            audio_size = audio.len(),
            "Sending transcription request"
        );

        let response = self
            .client
            .post(self.listen_url())
            .query(&[
                ("model", self.config.model.as_str()),
                ("punctuate", if self.config.punctuate { "true" } else { "false" }),
            ])
            .header(AUTHORIZATION, format!("Token {}", self.config.api_key))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SttError::Timeout
                } else if e.is_connect() {
                    SttError::NetworkError(format!("Cannot connect to Deepgram: {}", e))
                } else {
                    SttError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SttError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: ListenResponse = response
            .json()
            .await
            .map_err(|e| SttError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        // 取第一个声道的第一个候选
        let alternative = body
            .results
            .ok_or_else(|| SttError::InvalidResponse("Missing results".to_string()))?
            .channels
            .into_iter()
            .next()
            .ok_or_else(|| SttError::InvalidResponse("No channels in results".to_string()))?
            .alternatives
            .into_iter()
            .next()
            .ok_or_else(|| SttError::InvalidResponse("No alternatives in channel".to_string()))?;

        tracing::info!(
            transcript_len = alternative.transcript.len(),
            confidence = ?alternative.confidence,
            "Transcription request completed"
        );

        Ok(Transcript {
            text: alternative.transcript,
            confidence: alternative.confidence,
        })
    }
}
