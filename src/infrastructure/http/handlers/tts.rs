//! TTS Handler
//!
//! 文本 → 合成语音，以二进制音频响应返回

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// /tts 查询参数
#[derive(Debug, Deserialize)]
pub struct TtsParams {
    pub text: Option<String>,
    pub voice: Option<String>,
}

/// GET /tts - 文本转语音
///
/// 合成结果先落到输出目录的唯一文件，读回发给调用方后即删除
pub async fn text_to_speech(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TtsParams>,
) -> Result<Response, ApiError> {
    let text = params.text.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Query parameter 'text' is required".to_string(),
        ));
    }

    let voice = params
        .voice
        .unwrap_or_else(|| state.pipeline.default_voice().to_string());

    let output_path = state
        .pipeline
        .config()
        .output_dir
        .join(format!("tts_{}.mp3", Uuid::new_v4().simple()));

    tracing::info!(
        text_len = text.len(),
        voice = %voice,
        "Received TTS request"
    );

    let written = state
        .pipeline
        .synthesize_to_file(&text, &voice, &output_path)
        .await?;

    let audio = tokio::fs::read(&written)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read synthesized audio: {}", e)))?;

    // 输出文件只做瞬态中转，发出后即删除
    if let Err(e) = tokio::fs::remove_file(&written).await {
        tracing::warn!(
            path = %written.display(),
            error = %e,
            "Failed to remove synthesized audio file"
        );
    }

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/mpeg")
        .header(header::CONTENT_LENGTH, audio.len())
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"speech.mp3\"",
        )
        .body(Body::from(audio))
        .unwrap())
}
