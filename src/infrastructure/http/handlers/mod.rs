//! HTTP Handlers

mod root;
mod story;
mod stt;
mod tts;

pub use root::*;
pub use story::*;
pub use stt::*;
pub use tts::*;
