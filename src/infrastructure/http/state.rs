//! Application State
//!
//! 持有流水线实例；端口在这里注入，测试时可换成 Fake 客户端

use std::sync::Arc;

use crate::application::{
    PipelineConfig, StoryGeneratorPort, StoryPipeline, SttEnginePort, TtsEnginePort,
};

/// 应用状态
///
/// 流水线无状态，可被并发请求共享
pub struct AppState {
    pub pipeline: StoryPipeline,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        stt: Arc<dyn SttEnginePort>,
        story: Arc<dyn StoryGeneratorPort>,
        tts: Arc<dyn TtsEnginePort>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            pipeline: StoryPipeline::new(stt, story, tts, config),
        }
    }
}
