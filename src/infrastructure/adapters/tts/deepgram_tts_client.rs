//! Deepgram TTS Client - 调用 Deepgram 语音合成 API
//!
//! 实现 TtsEnginePort trait
//!
//! 外部 API:
//! POST {base_url}/v1/speak?model={voice}
//! Request: {"text": "..."}  (JSON)
//! Response: 音频二进制，按分块流式返回

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::application::ports::{AudioChunkStream, SpeakRequest, TtsEnginePort, TtsError};

/// Deepgram TTS 客户端配置
#[derive(Debug, Clone)]
pub struct DeepgramTtsClientConfig {
    /// API Key
    pub api_key: String,
    /// API 基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for DeepgramTtsClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.deepgram.com".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Deepgram TTS 客户端
pub struct DeepgramTtsClient {
    client: Client,
    config: DeepgramTtsClientConfig,
}

impl DeepgramTtsClient {
    /// 创建新的 TTS 客户端
    pub fn new(config: DeepgramTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn speak_url(&self) -> String {
        format!("{}/v1/speak", self.config.base_url)
    }
}

#[async_trait]
impl TtsEnginePort for DeepgramTtsClient {
    async fn synthesize(&self, request: SpeakRequest) -> Result<AudioChunkStream, TtsError> {
        tracing::debug!(
            url = %self.speak_url(),
            voice = %request.voice,
            text_len = request.text.len(),
            "Sending TTS speak request"
        );

        let response = self
            .client
            .post(self.speak_url())
            .query(&[("model", request.voice.as_str())])
            .header(AUTHORIZATION, format!("Token {}", self.config.api_key))
            .json(&json!({"text": request.text}))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to Deepgram: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        // 响应体按接收顺序转发给调用方
        let stream = response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })
        });

        Ok(Box::pin(stream))
    }
}
