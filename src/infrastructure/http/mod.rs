//! HTTP Infrastructure
//!
//! Axum 服务器、路由、处理器与错误映射

mod error;
mod handlers;
mod middleware;
mod routes;
mod server;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
