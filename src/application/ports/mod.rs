//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod story_generator;
mod stt_engine;
mod tts_engine;

pub use story_generator::{StoryError, StoryGeneratorPort};
pub use stt_engine::{SttEnginePort, SttError, Transcript};
pub use tts_engine::{AudioChunkStream, SpeakRequest, TtsEnginePort, TtsError};
