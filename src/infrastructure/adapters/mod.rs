//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod story;
pub mod stt;
pub mod tts;

pub use story::*;
pub use stt::*;
pub use tts::*;
