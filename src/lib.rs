//! Retell - 语音转故事服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Story: 故事风格/篇幅与提示词构造
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SttEngine, StoryGenerator, TtsEngine）
//! - Pipeline: 转写 → 生成故事 → 语音合成 的三段式编排
//! - Scratch: 上传音频的临时文件生命周期管理
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API（/stt, /stt-with-story, /tts）
//! - Adapters: Deepgram STT/TTS 客户端, Gemini 故事生成客户端

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
