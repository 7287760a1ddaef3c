//! Story Handler
//!
//! 上传音频 → 转写 → 生成故事 → 合成语音，一次调用完成

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::ChainedOptions;
use crate::domain::{StoryLength, StoryStyle};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

use super::stt::read_audio_upload;

/// /stt-with-story 查询参数
///
/// 不传时分别回退到 creative / short / 配置的默认音色
#[derive(Debug, Deserialize)]
pub struct StoryParams {
    pub style: Option<String>,
    pub length: Option<String>,
    pub voice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoryResponse {
    /// 合成音频的文件引用
    pub audio: String,
    pub transcript: String,
    pub story: String,
}

/// POST /stt-with-story - 链式调用
pub async fn speech_to_story(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StoryParams>,
    mut multipart: Multipart,
) -> Result<Json<StoryResponse>, ApiError> {
    let upload = read_audio_upload(&mut multipart).await?;

    let options = ChainedOptions {
        style: params
            .style
            .as_deref()
            .map(StoryStyle::from_param)
            .unwrap_or(StoryStyle::Creative),
        length: params
            .length
            .as_deref()
            .map(StoryLength::from_param)
            .unwrap_or(StoryLength::Short),
        voice: params.voice,
    };

    tracing::info!(
        filename = %upload.filename,
        size = upload.data.len(),
        style = %options.style,
        length = %options.length,
        "Received chained story request"
    );

    let result = state
        .pipeline
        .run_chained(upload.data, &upload.filename, options)
        .await?;

    Ok(Json(StoryResponse {
        audio: result.audio_path.display().to_string(),
        transcript: result.transcript,
        story: result.story,
    }))
}
