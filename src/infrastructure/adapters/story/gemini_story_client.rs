//! Gemini Story Client - 调用 Gemini 文本生成 API
//!
//! 实现 StoryGeneratorPort trait
//!
//! 外部 API:
//! POST {base_url}/{api_version}/models/{model}:generateContent?key={api_key}
//! Request: {"contents": [{"role": "user", "parts": [{"text": prompt}]}]}
//! Response: 生成文本位于 candidates[0].content.parts[*].text

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::application::ports::{StoryError, StoryGeneratorPort};

/// Gemini 客户端配置
#[derive(Debug, Clone)]
pub struct GeminiStoryClientConfig {
    /// API Key（Google AI Studio）
    pub api_key: String,
    /// API 基础 URL
    pub base_url: String,
    /// API 版本
    pub api_version: String,
    /// 生成模型
    pub model: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for GeminiStoryClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_version: "v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Gemini generateContent 响应结构
///
/// 只反序列化用到的字段
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: Option<String>,
}

/// Gemini 故事生成客户端
pub struct GeminiStoryClient {
    client: Client,
    config: GeminiStoryClientConfig,
}

impl GeminiStoryClient {
    /// 创建新的生成客户端
    pub fn new(config: GeminiStoryClientConfig) -> Result<Self, StoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoryError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.config.base_url, self.config.api_version, self.config.model
        )
    }
}

#[async_trait]
impl StoryGeneratorPort for GeminiStoryClient {
    async fn generate(&self, prompt: &str) -> Result<String, StoryError> {
        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending generation request"
        );

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }]
        });

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StoryError::Timeout
                } else if e.is_connect() {
                    StoryError::NetworkError(format!("Cannot connect to Gemini: {}", e))
                } else {
                    StoryError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoryError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| StoryError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let candidate = body
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| StoryError::InvalidResponse("No candidates returned".to_string()))?;

        // 一个候选可能被拆成多个 part，拼接后即完整文本
        let text: String = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(StoryError::InvalidResponse(
                "Candidate has no text content".to_string(),
            ));
        }

        tracing::info!(story_len = text.len(), "Generation request completed");

        Ok(text)
    }
}
