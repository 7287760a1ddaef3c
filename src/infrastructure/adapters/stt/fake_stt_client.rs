//! Fake STT Client - 用于测试的语音识别客户端
//!
//! 返回固定转写文本，不实际调用识别服务；带调用计数

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{SttEnginePort, SttError, Transcript};

/// Fake STT Client
pub struct FakeSttClient {
    transcript: String,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeSttClient {
    /// 创建始终返回固定转写文本的客户端
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// 创建始终失败的客户端
    pub fn failing() -> Self {
        Self {
            transcript: String::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// 已被调用的次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SttEnginePort for FakeSttClient {
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcript, SttError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(audio_size = audio.len(), "FakeSttClient: transcribe");

        if self.fail {
            return Err(SttError::ServiceError("fake stt failure".to_string()));
        }

        Ok(Transcript {
            text: self.transcript.clone(),
            confidence: Some(0.99),
        })
    }
}
