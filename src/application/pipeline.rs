//! Story Pipeline - 请求编排
//!
//! 三段式顺序流水线：转写 → 故事生成 → 语音合成。
//! 无状态，不跨请求共享数据；每个阶段至多调用一次外部服务，
//! 失败即短路，不重试

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::domain::{build_story_prompt, StoryLength, StoryStyle};

use super::ports::{
    SpeakRequest, StoryError, StoryGeneratorPort, SttEnginePort, SttError, TtsEnginePort, TtsError,
};
use super::scratch::ScratchFile;

/// 流水线错误
///
/// 三个阶段统一走 Result，合成阶段不再以空引用表示失败
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Transcription failed: {0}")]
    Transcription(#[from] SttError),

    #[error("Story generation failed: {0}")]
    Generation(#[from] StoryError),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[from] TtsError),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// 流水线配置
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 上传音频的临时目录
    pub scratch_dir: PathBuf,
    /// 合成音频的输出目录
    pub output_dir: PathBuf,
    /// 默认合成音色
    pub default_voice: String,
}

/// 链式调用选项（/stt-with-story）
#[derive(Debug, Clone)]
pub struct ChainedOptions {
    pub style: StoryStyle,
    pub length: StoryLength,
    /// 为 None 时使用配置的默认音色
    pub voice: Option<String>,
}

impl Default for ChainedOptions {
    fn default() -> Self {
        Self {
            style: StoryStyle::Creative,
            length: StoryLength::Short,
            voice: None,
        }
    }
}

/// 链式调用成功结果
#[derive(Debug, Clone)]
pub struct ChainedStory {
    pub transcript: String,
    pub story: String,
    pub audio_path: PathBuf,
}

/// 链式调用错误
///
/// 携带失败前已完成阶段的结果，合成失败时调用方仍能拿到
/// 转写文本和故事文本
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ChainedError {
    pub transcript: Option<String>,
    pub story: Option<String>,
    #[source]
    pub source: PipelineError,
}

/// Story Pipeline
///
/// 端口通过构造函数注入，测试时可替换为 Fake 实现
pub struct StoryPipeline {
    stt: Arc<dyn SttEnginePort>,
    story: Arc<dyn StoryGeneratorPort>,
    tts: Arc<dyn TtsEnginePort>,
    config: PipelineConfig,
}

impl StoryPipeline {
    /// 创建流水线
    pub fn new(
        stt: Arc<dyn SttEnginePort>,
        story: Arc<dyn StoryGeneratorPort>,
        tts: Arc<dyn TtsEnginePort>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            stt,
            story,
            tts,
            config,
        }
    }

    /// 流水线配置
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 默认合成音色
    pub fn default_voice(&self) -> &str {
        &self.config.default_voice
    }

    /// 转写上传的音频
    ///
    /// 音频字节先落到唯一命名的临时文件，再读回发给识别服务；
    /// 无论转写成功与否，临时文件都在返回前删除
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename_hint: &str,
    ) -> Result<String, PipelineError> {
        let scratch = ScratchFile::create(&self.config.scratch_dir, filename_hint, &audio)
            .await
            .map_err(|e| PipelineError::Storage(format!("Failed to persist upload: {}", e)))?;

        let result = self.transcribe_scratch(&scratch).await;

        // 成功失败都先清理临时文件再返回
        if let Err(e) = scratch.remove().await {
            tracing::warn!(error = %e, "Failed to remove scratch file");
        }

        let transcript = result?;
        tracing::info!(
            transcript_len = transcript.text.len(),
            confidence = ?transcript.confidence,
            "Transcription completed"
        );

        Ok(transcript.text)
    }

    async fn transcribe_scratch(
        &self,
        scratch: &ScratchFile,
    ) -> Result<super::ports::Transcript, PipelineError> {
        let data = scratch
            .read()
            .await
            .map_err(|e| PipelineError::Storage(format!("Failed to read upload: {}", e)))?;

        Ok(self.stt.transcribe(&data).await?)
    }

    /// 把转写文本改写成故事
    pub async fn generate_story(
        &self,
        transcript: &str,
        style: StoryStyle,
        length: StoryLength,
    ) -> Result<String, PipelineError> {
        let prompt = build_story_prompt(transcript, style, length);

        tracing::debug!(
            style = %style,
            length = %length,
            prompt_len = prompt.len(),
            "Requesting story generation"
        );

        let story = self.story.generate(&prompt).await?;

        tracing::info!(story_len = story.len(), "Story generation completed");

        Ok(story)
    }

    /// 合成语音并写入指定文件
    ///
    /// 分块按接收顺序写入（创建或截断目标文件）；任何阶段失败时
    /// 尽力删除写了一半的输出文件，再返回错误
    pub async fn synthesize_to_file(
        &self,
        text: &str,
        voice: &str,
        output_path: &Path,
    ) -> Result<PathBuf, PipelineError> {
        let request = SpeakRequest {
            text: text.to_string(),
            voice: voice.to_string(),
        };

        let stream = self.tts.synthesize(request).await?;

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PipelineError::Storage(format!("Failed to create output dir: {}", e)))?;
        }

        let file = fs::File::create(output_path)
            .await
            .map_err(|e| PipelineError::Storage(format!("Failed to create output file: {}", e)))?;

        match write_chunks(file, stream).await {
            Ok((chunks, bytes)) => {
                tracing::info!(
                    path = %output_path.display(),
                    chunks,
                    bytes,
                    "Speech synthesis completed"
                );
                Ok(output_path.to_path_buf())
            }
            Err(e) => {
                // 不保留写了一半的输出文件
                if let Err(re) = fs::remove_file(output_path).await {
                    if re.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(
                            path = %output_path.display(),
                            error = %re,
                            "Failed to remove partial output file"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    /// 链式调用：转写 → 故事生成 → 语音合成
    ///
    /// 任一阶段失败即短路；错误里保留已完成阶段的结果
    pub async fn run_chained(
        &self,
        audio: Vec<u8>,
        filename_hint: &str,
        options: ChainedOptions,
    ) -> Result<ChainedStory, ChainedError> {
        let transcript = match self.transcribe(audio, filename_hint).await {
            Ok(t) => t,
            Err(e) => {
                return Err(ChainedError {
                    transcript: None,
                    story: None,
                    source: e,
                })
            }
        };

        let story = match self
            .generate_story(&transcript, options.style, options.length)
            .await
        {
            Ok(s) => s,
            Err(e) => {
                return Err(ChainedError {
                    transcript: Some(transcript),
                    story: None,
                    source: e,
                })
            }
        };

        let voice = options
            .voice
            .as_deref()
            .unwrap_or(&self.config.default_voice);
        let output_path = self
            .config
            .output_dir
            .join(format!("story_{}.mp3", Uuid::new_v4().simple()));

        match self.synthesize_to_file(&story, voice, &output_path).await {
            Ok(audio_path) => Ok(ChainedStory {
                transcript,
                story,
                audio_path,
            }),
            Err(e) => Err(ChainedError {
                transcript: Some(transcript),
                story: Some(story),
                source: e,
            }),
        }
    }
}

/// 把分块流按顺序写入文件，返回 (分块数, 总字节数)
async fn write_chunks(
    mut file: fs::File,
    mut stream: super::ports::AudioChunkStream,
) -> Result<(usize, u64), PipelineError> {
    let mut chunks = 0usize;
    let mut bytes = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(PipelineError::Synthesis)?;
        file.write_all(&chunk)
            .await
            .map_err(|e| PipelineError::Storage(format!("Failed to write audio chunk: {}", e)))?;
        chunks += 1;
        bytes += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| PipelineError::Storage(format!("Failed to flush output file: {}", e)))?;

    Ok((chunks, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::{
        FakeStoryClient, FakeSttClient, FakeTtsClient, FakeTtsMode,
    };
    use bytes::Bytes;
    use tempfile::tempdir;

    struct TestEnv {
        pipeline: StoryPipeline,
        stt: Arc<FakeSttClient>,
        story: Arc<FakeStoryClient>,
        tts: Arc<FakeTtsClient>,
        _scratch: tempfile::TempDir,
        scratch_dir: PathBuf,
        _output: tempfile::TempDir,
        output_dir: PathBuf,
    }

    fn build_env(stt: FakeSttClient, story: FakeStoryClient, tts: FakeTtsClient) -> TestEnv {
        let scratch = tempdir().unwrap();
        let output = tempdir().unwrap();
        let scratch_dir = scratch.path().to_path_buf();
        let output_dir = output.path().to_path_buf();

        let stt = Arc::new(stt);
        let story = Arc::new(story);
        let tts = Arc::new(tts);

        let pipeline = StoryPipeline::new(
            stt.clone(),
            story.clone(),
            tts.clone(),
            PipelineConfig {
                scratch_dir: scratch_dir.clone(),
                output_dir: output_dir.clone(),
                default_voice: "aura-asteria-en".to_string(),
            },
        );

        TestEnv {
            pipeline,
            stt,
            story,
            tts,
            _scratch: scratch,
            scratch_dir,
            _output: output,
            output_dir,
        }
    }

    fn default_env() -> TestEnv {
        build_env(
            FakeSttClient::new("A dog ran across a busy street."),
            FakeStoryClient::new("Once upon a time, a brave dog crossed the town."),
            FakeTtsClient::new(vec![Bytes::from_static(b"audio")]),
        )
    }

    fn dir_entry_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_transcribe_returns_text_and_cleans_scratch() {
        let env = default_env();

        let transcript = env
            .pipeline
            .transcribe(b"fake audio".to_vec(), "clip.wav")
            .await
            .unwrap();

        assert_eq!(transcript, "A dog ran across a busy street.");
        assert_eq!(env.stt.call_count(), 1);
        assert_eq!(dir_entry_count(&env.scratch_dir), 0);
    }

    #[tokio::test]
    async fn test_transcribe_failure_still_cleans_scratch() {
        let env = build_env(
            FakeSttClient::failing(),
            FakeStoryClient::new("unused"),
            FakeTtsClient::new(vec![]),
        );

        let err = env
            .pipeline
            .transcribe(b"fake audio".to_vec(), "clip.wav")
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Transcription(_)));
        assert_eq!(dir_entry_count(&env.scratch_dir), 0);
    }

    #[tokio::test]
    async fn test_generate_story_single_call_distinct_output() {
        let env = default_env();
        let transcript = "A dog ran across a busy street.";

        let story = env
            .pipeline
            .generate_story(transcript, StoryStyle::Humorous, StoryLength::Short)
            .await
            .unwrap();

        assert!(!story.is_empty());
        assert_ne!(story, transcript);
        assert_eq!(env.story.call_count(), 1);

        // 提示词必须逐字包含转写文本、风格与篇幅区间
        let prompt = env.story.last_prompt().unwrap();
        assert!(prompt.contains(transcript));
        assert!(prompt.contains("humorous"));
        assert!(prompt.contains("around 150-200 words"));
    }

    #[tokio::test]
    async fn test_synthesize_writes_chunks_in_order() {
        let env = build_env(
            FakeSttClient::new("unused"),
            FakeStoryClient::new("unused"),
            FakeTtsClient::new(vec![
                Bytes::from_static(b"first-"),
                Bytes::from_static(b"second-"),
                Bytes::from_static(b"third"),
            ]),
        );

        let output_path = env.output_dir.join("speech.mp3");
        let written = env
            .pipeline
            .synthesize_to_file("hello", "aura-asteria-en", &output_path)
            .await
            .unwrap();

        let data = std::fs::read(&written).unwrap();
        assert_eq!(data, b"first-second-third");
        // 文件长度等于所有分块长度之和
        assert_eq!(data.len(), "first-".len() + "second-".len() + "third".len());
    }

    #[tokio::test]
    async fn test_synthesize_mid_stream_failure_removes_partial_file() {
        let env = build_env(
            FakeSttClient::new("unused"),
            FakeStoryClient::new("unused"),
            FakeTtsClient::with_mode(
                vec![Bytes::from_static(b"first-"), Bytes::from_static(b"second")],
                FakeTtsMode::FailMidStream { after: 1 },
            ),
        );

        let output_path = env.output_dir.join("speech.mp3");
        let err = env
            .pipeline
            .synthesize_to_file("hello", "aura-asteria-en", &output_path)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Synthesis(_)));
        assert!(!output_path.exists());
    }

    #[tokio::test]
    async fn test_chained_success() {
        let env = default_env();

        let result = env
            .pipeline
            .run_chained(b"fake audio".to_vec(), "clip.wav", ChainedOptions::default())
            .await
            .unwrap();

        assert_eq!(result.transcript, "A dog ran across a busy street.");
        assert_eq!(result.story, "Once upon a time, a brave dog crossed the town.");
        assert!(result.audio_path.exists());
        assert_eq!(env.stt.call_count(), 1);
        assert_eq!(env.story.call_count(), 1);
        assert_eq!(env.tts.call_count(), 1);
        assert_eq!(dir_entry_count(&env.scratch_dir), 0);
    }

    #[tokio::test]
    async fn test_chained_transcription_failure_short_circuits() {
        let env = build_env(
            FakeSttClient::failing(),
            FakeStoryClient::new("unused"),
            FakeTtsClient::new(vec![Bytes::from_static(b"audio")]),
        );

        let err = env
            .pipeline
            .run_chained(b"fake audio".to_vec(), "clip.wav", ChainedOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err.source, PipelineError::Transcription(_)));
        assert!(err.transcript.is_none());
        assert!(err.story.is_none());
        // 后续阶段一次都不应被调用
        assert_eq!(env.story.call_count(), 0);
        assert_eq!(env.tts.call_count(), 0);
    }

    #[tokio::test]
    async fn test_chained_generation_failure_keeps_transcript() {
        let env = build_env(
            FakeSttClient::new("the transcript"),
            FakeStoryClient::failing(),
            FakeTtsClient::new(vec![Bytes::from_static(b"audio")]),
        );

        let err = env
            .pipeline
            .run_chained(b"fake audio".to_vec(), "clip.wav", ChainedOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err.source, PipelineError::Generation(_)));
        assert_eq!(err.transcript.as_deref(), Some("the transcript"));
        assert!(err.story.is_none());
        assert_eq!(env.tts.call_count(), 0);
    }

    #[tokio::test]
    async fn test_chained_synthesis_failure_keeps_earlier_stages() {
        let env = build_env(
            FakeSttClient::new("the transcript"),
            FakeStoryClient::new("the story"),
            FakeTtsClient::with_mode(vec![], FakeTtsMode::FailRequest),
        );

        let err = env
            .pipeline
            .run_chained(b"fake audio".to_vec(), "clip.wav", ChainedOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err.source, PipelineError::Synthesis(_)));
        assert_eq!(err.transcript.as_deref(), Some("the transcript"));
        assert_eq!(err.story.as_deref(), Some("the story"));
        // 失败的合成不留输出文件
        assert_eq!(dir_entry_count(&env.output_dir), 0);
    }
}
