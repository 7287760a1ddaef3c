//! Fake TTS Client - 用于测试的语音合成客户端
//!
//! 返回固定的音频分块流，不实际调用合成服务；支持模拟
//! 请求失败与流中途失败

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{AudioChunkStream, SpeakRequest, TtsEnginePort, TtsError};

/// Fake TTS Client 行为模式
#[derive(Debug, Clone, Copy)]
pub enum FakeTtsMode {
    /// 正常返回所有分块
    Succeed,
    /// 请求阶段直接失败
    FailRequest,
    /// 返回前 `after` 个分块后流中途失败
    FailMidStream { after: usize },
}

/// Fake TTS Client
pub struct FakeTtsClient {
    chunks: Vec<Bytes>,
    mode: FakeTtsMode,
    calls: AtomicUsize,
}

impl FakeTtsClient {
    /// 创建始终成功返回固定分块的客户端
    pub fn new(chunks: Vec<Bytes>) -> Self {
        Self::with_mode(chunks, FakeTtsMode::Succeed)
    }

    /// 指定行为模式创建
    pub fn with_mode(chunks: Vec<Bytes>, mode: FakeTtsMode) -> Self {
        Self {
            chunks,
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    /// 已被调用的次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SpeakRequest) -> Result<AudioChunkStream, TtsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(
            voice = %request.voice,
            text_len = request.text.len(),
            "FakeTtsClient: synthesize"
        );

        match self.mode {
            FakeTtsMode::FailRequest => {
                Err(TtsError::ServiceError("fake tts failure".to_string()))
            }
            FakeTtsMode::Succeed => {
                let items: Vec<Result<Bytes, TtsError>> =
                    self.chunks.iter().cloned().map(Ok).collect();
                Ok(Box::pin(stream::iter(items)))
            }
            FakeTtsMode::FailMidStream { after } => {
                let mut items: Vec<Result<Bytes, TtsError>> =
                    self.chunks.iter().take(after).cloned().map(Ok).collect();
                items.push(Err(TtsError::ServiceError(
                    "fake tts stream failure".to_string(),
                )));
                Ok(Box::pin(stream::iter(items)))
            }
        }
    }
}
