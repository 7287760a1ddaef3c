//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SttEngine、StoryGenerator、TtsEngine）
//! - pipeline: 转写 → 故事生成 → 语音合成 的三段式编排
//! - scratch: 上传音频的临时文件生命周期管理

pub mod pipeline;
pub mod ports;
pub mod scratch;

pub use pipeline::{
    ChainedError, ChainedOptions, ChainedStory, PipelineConfig, PipelineError, StoryPipeline,
};
pub use ports::{
    AudioChunkStream, SpeakRequest, StoryError, StoryGeneratorPort, SttEnginePort, SttError,
    Transcript, TtsEnginePort, TtsError,
};
pub use scratch::ScratchFile;
