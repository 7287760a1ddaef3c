//! STT Engine Port - 语音识别引擎抽象
//!
//! 定义语音转写的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// STT 错误
#[derive(Debug, Error)]
pub enum SttError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 转写结果
#[derive(Debug, Clone)]
pub struct Transcript {
    /// 转写文本（第一个声道的第一个候选）
    pub text: String,
    /// 置信度（服务端元数据，仅用于日志）
    pub confidence: Option<f64>,
}

/// STT Engine Port
///
/// 外部语音识别服务的抽象接口
#[async_trait]
pub trait SttEnginePort: Send + Sync {
    /// 转写一段音频
    ///
    /// 发送原始音频字节到外部识别服务，返回转写文本
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcript, SttError>;
}
