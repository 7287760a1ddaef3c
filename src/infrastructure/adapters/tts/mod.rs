//! TTS Adapter - Deepgram 语音合成客户端实现

mod deepgram_tts_client;
mod fake_tts_client;

pub use deepgram_tts_client::{DeepgramTtsClient, DeepgramTtsClientConfig};
pub use fake_tts_client::{FakeTtsClient, FakeTtsMode};
