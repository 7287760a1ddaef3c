//! HTTP Routes
//!
//! API 路由定义
//!
//! API Endpoints:
//! - /                GET   服务状态
//! - /stt             POST  上传音频，返回转写文本
//! - /stt-with-story  POST  上传音频，转写 → 生成故事 → 合成语音
//! - /tts             GET   文本转语音，返回二进制音频

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::service_status))
        .route("/stt", post(handlers::speech_to_text))
        .route("/stt-with-story", post(handlers::speech_to_story))
        .route("/tts", get(handlers::text_to_speech))
}
