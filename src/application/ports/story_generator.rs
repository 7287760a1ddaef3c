//! Story Generator Port - 文本生成引擎抽象
//!
//! 定义故事生成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// 故事生成错误
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Story Generator Port
///
/// 外部文本生成服务的抽象接口
#[async_trait]
pub trait StoryGeneratorPort: Send + Sync {
    /// 根据提示词生成文本，原样返回模型输出
    async fn generate(&self, prompt: &str) -> Result<String, StoryError>;
}
