//! Domain Layer - 领域层
//!
//! Story: 故事风格/篇幅枚举与生成提示词构造

mod story;

pub use story::{build_story_prompt, StoryLength, StoryStyle};
