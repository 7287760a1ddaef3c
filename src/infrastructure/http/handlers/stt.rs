//! STT Handler
//!
//! 上传音频 → 转写文本

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 上传的音频
pub(crate) struct UploadedAudio {
    pub data: Vec<u8>,
    pub filename: String,
}

/// 从 multipart 中读取 `file` 字段
///
/// 字段缺失或内容为空都视为请求不合法
pub(crate) async fn read_audio_upload(multipart: &mut Multipart) -> Result<UploadedAudio, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();
        if field_name != "file" {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?
            .to_vec();

        if data.is_empty() {
            return Err(ApiError::BadRequest(
                "Uploaded audio file is empty".to_string(),
            ));
        }

        return Ok(UploadedAudio { data, filename });
    }

    Err(ApiError::BadRequest("Audio file is required".to_string()))
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub transcript: String,
}

/// POST /stt - 转写上传的音频
pub async fn speech_to_text(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let upload = read_audio_upload(&mut multipart).await?;

    tracing::info!(
        filename = %upload.filename,
        size = upload.data.len(),
        "Received transcription request"
    );

    let transcript = state
        .pipeline
        .transcribe(upload.data, &upload.filename)
        .await?;

    Ok(Json(TranscriptResponse { transcript }))
}
