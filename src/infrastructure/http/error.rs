//! HTTP Error Handling
//!
//! 把流水线错误统一映射为 `{"error": ...}` JSON 响应：
//! - 请求不合法 → 400
//! - 上游服务失败 → 502
//! - 本地存储失败 → 500
//!
//! 链式调用失败时响应额外携带已完成阶段的 transcript / story

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::{ChainedError, PipelineError};

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            transcript: None,
            story: None,
        }
    }
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 请求本身不合法（上传缺失、参数缺失、空文件等）
    BadRequest(String),
    /// 上游服务调用失败
    UpstreamFailure(String),
    /// 本地存储等内部错误
    Internal(String),
    /// 链式调用失败，携带已完成阶段的结果
    ChainFailure {
        error: PipelineError,
        transcript: Option<String>,
        story: Option<String>,
    },
}

/// 流水线错误对应的状态码
///
/// 存储错误是本服务的问题（500），其余都是上游失败（502）
fn pipeline_status(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, response) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, ErrorResponse::new(msg))
            }
            ApiError::UpstreamFailure(msg) => {
                tracing::error!(error = %msg, "Upstream service failure");
                (StatusCode::BAD_GATEWAY, ErrorResponse::new(msg))
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(msg))
            }
            ApiError::ChainFailure {
                error,
                transcript,
                story,
            } => {
                let status = pipeline_status(&error);
                let msg = error.to_string();
                tracing::error!(
                    error = %msg,
                    has_transcript = transcript.is_some(),
                    has_story = story.is_some(),
                    "Pipeline chain failure"
                );
                (
                    status,
                    ErrorResponse {
                        error: msg,
                        transcript,
                        story,
                    },
                )
            }
        };

        (status, Json(response)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Storage(_) => ApiError::Internal(e.to_string()),
            _ => ApiError::UpstreamFailure(e.to_string()),
        }
    }
}

impl From<ChainedError> for ApiError {
    fn from(e: ChainedError) -> Self {
        ApiError::ChainFailure {
            error: e.source,
            transcript: e.transcript,
            story: e.story,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{SttError, TtsError};

    #[test]
    fn test_pipeline_status_mapping() {
        assert_eq!(
            pipeline_status(&PipelineError::Storage("disk full".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            pipeline_status(&PipelineError::Transcription(SttError::Timeout)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            pipeline_status(&PipelineError::Synthesis(TtsError::Timeout)),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_response_skips_absent_partials() {
        let body = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(body, serde_json::json!({"error": "boom"}));
    }

    #[test]
    fn test_error_response_keeps_partials() {
        let body = serde_json::to_value(ErrorResponse {
            error: "synthesis failed".to_string(),
            transcript: Some("t".to_string()),
            story: Some("s".to_string()),
        })
        .unwrap();
        assert_eq!(body["transcript"], "t");
        assert_eq!(body["story"], "s");
    }
}
