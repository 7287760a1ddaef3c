//! Story Adapter - Gemini 故事生成客户端实现

mod fake_story_client;
mod gemini_story_client;

pub use fake_story_client::FakeStoryClient;
pub use gemini_story_client::{GeminiStoryClient, GeminiStoryClientConfig};
