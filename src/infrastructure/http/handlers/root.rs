//! Root Handler
//!
//! 服务状态探测端点

use axum::Json;
use serde::Serialize;

/// 状态响应
#[derive(Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
    pub version: &'static str,
}

/// GET / - 服务状态
pub async fn service_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Speech-to-Text API is running 🚀",
        version: env!("CARGO_PKG_VERSION"),
    })
}
