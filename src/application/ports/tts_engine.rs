//! TTS Engine Port - 语音合成引擎抽象
//!
//! 定义语音合成的抽象接口，具体实现在 infrastructure/adapters 层
//!
//! 合成结果是有序的二进制分块流，调用方按接收顺序落盘

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use std::pin::Pin;
use thiserror::Error;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 语音合成请求
#[derive(Debug, Clone)]
pub struct SpeakRequest {
    /// 要合成的文本内容
    pub text: String,
    /// 音色标识
    pub voice: String,
}

/// 合成音频分块流
pub type AudioChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, TtsError>> + Send>>;

/// TTS Engine Port
///
/// 外部 TTS 服务的抽象接口
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 执行语音合成
    ///
    /// 返回有序的音频分块流，分块顺序即音频内容顺序
    async fn synthesize(&self, request: SpeakRequest) -> Result<AudioChunkStream, TtsError>;
}
