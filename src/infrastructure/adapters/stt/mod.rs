//! STT Adapter - Deepgram 语音识别客户端实现

mod deepgram_stt_client;
mod fake_stt_client;

pub use deepgram_stt_client::{DeepgramSttClient, DeepgramSttClientConfig};
pub use fake_stt_client::FakeSttClient;
