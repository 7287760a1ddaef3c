//! Fake Story Client - 用于测试的故事生成客户端
//!
//! 返回固定故事文本，并记录最近一次收到的提示词

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::ports::{StoryError, StoryGeneratorPort};

/// Fake Story Client
pub struct FakeStoryClient {
    story: String,
    fail: bool,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl FakeStoryClient {
    /// 创建始终返回固定故事的客户端
    pub fn new(story: impl Into<String>) -> Self {
        Self {
            story: story.into(),
            fail: false,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// 创建始终失败的客户端
    pub fn failing() -> Self {
        Self {
            story: String::new(),
            fail: true,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// 已被调用的次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 最近一次收到的提示词
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoryGeneratorPort for FakeStoryClient {
    async fn generate(&self, prompt: &str) -> Result<String, StoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        tracing::debug!(prompt_len = prompt.len(), "FakeStoryClient: generate");

        if self.fail {
            return Err(StoryError::ServiceError("fake story failure".to_string()));
        }

        Ok(self.story.clone())
    }
}
