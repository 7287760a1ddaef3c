//! 故事生成领域逻辑
//!
//! 定义故事风格、篇幅档位以及发送给生成模型的提示词构造

use std::fmt;

/// 故事风格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoryStyle {
    #[default]
    Creative,
    Dramatic,
    Humorous,
    Mysterious,
}

impl StoryStyle {
    /// 从请求参数解析风格
    ///
    /// 无法识别的取值回退到 creative
    pub fn from_param(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "dramatic" => StoryStyle::Dramatic,
            "humorous" => StoryStyle::Humorous,
            "mysterious" => StoryStyle::Mysterious,
            _ => StoryStyle::Creative,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryStyle::Creative => "creative",
            StoryStyle::Dramatic => "dramatic",
            StoryStyle::Humorous => "humorous",
            StoryStyle::Mysterious => "mysterious",
        }
    }
}

impl fmt::Display for StoryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 故事篇幅档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl StoryLength {
    /// 从请求参数解析篇幅
    ///
    /// 无法识别的取值回退到 medium
    pub fn from_param(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => StoryLength::Short,
            "long" => StoryLength::Long,
            _ => StoryLength::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryLength::Short => "short",
            StoryLength::Medium => "medium",
            StoryLength::Long => "long",
        }
    }

    /// 对应的目标字数区间描述（直接嵌入提示词）
    pub fn word_band(&self) -> &'static str {
        match self {
            StoryLength::Short => "around 150-200 words",
            StoryLength::Medium => "around 300-400 words",
            StoryLength::Long => "around 600-800 words",
        }
    }
}

impl fmt::Display for StoryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 构造故事生成提示词
///
/// 提示词要求模型把原文改写为指定风格与篇幅的故事，并加入人物、
/// 对话、场景、情节等叙事元素；原文逐字嵌入提示词中
pub fn build_story_prompt(text: &str, style: StoryStyle, length: StoryLength) -> String {
    format!(
        "Take the following text and transform it into a {style} story.\n\
         Use the context, themes, and elements from the text to create an engaging narrative.\n\
         The story should be {band}.\n\
         \n\
         Original text:\n\
         {text}\n\
         \n\
         Create a compelling story that captures the essence of this text while adding \
         narrative elements like characters, dialogue, setting, and plot development where appropriate.",
        style = style.as_str(),
        band = length.word_band(),
        text = text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_from_param() {
        assert_eq!(StoryStyle::from_param("dramatic"), StoryStyle::Dramatic);
        assert_eq!(StoryStyle::from_param("HUMOROUS"), StoryStyle::Humorous);
        assert_eq!(StoryStyle::from_param(" mysterious "), StoryStyle::Mysterious);
        assert_eq!(StoryStyle::from_param("creative"), StoryStyle::Creative);
    }

    #[test]
    fn test_unknown_style_falls_back_to_creative() {
        assert_eq!(StoryStyle::from_param("noir"), StoryStyle::Creative);
        assert_eq!(StoryStyle::from_param(""), StoryStyle::Creative);
    }

    #[test]
    fn test_length_from_param() {
        assert_eq!(StoryLength::from_param("short"), StoryLength::Short);
        assert_eq!(StoryLength::from_param("Long"), StoryLength::Long);
        assert_eq!(StoryLength::from_param("medium"), StoryLength::Medium);
    }

    #[test]
    fn test_unknown_length_falls_back_to_medium() {
        assert_eq!(StoryLength::from_param("epic"), StoryLength::Medium);
        assert_eq!(StoryLength::from_param(""), StoryLength::Medium);
    }

    #[test]
    fn test_word_bands() {
        assert_eq!(StoryLength::Short.word_band(), "around 150-200 words");
        assert_eq!(StoryLength::Medium.word_band(), "around 300-400 words");
        assert_eq!(StoryLength::Long.word_band(), "around 600-800 words");
    }

    #[test]
    fn test_prompt_contains_transcript_verbatim() {
        let transcript = "A dog ran across a busy street.";
        for style in [
            StoryStyle::Creative,
            StoryStyle::Dramatic,
            StoryStyle::Humorous,
            StoryStyle::Mysterious,
        ] {
            for length in [StoryLength::Short, StoryLength::Medium, StoryLength::Long] {
                let prompt = build_story_prompt(transcript, style, length);
                assert!(prompt.contains(transcript));
                assert!(prompt.contains(style.as_str()));
                assert!(prompt.contains(length.word_band()));
            }
        }
    }

    #[test]
    fn test_unknown_length_uses_medium_band_in_prompt() {
        let length = StoryLength::from_param("gigantic");
        let prompt = build_story_prompt("text", StoryStyle::Creative, length);
        assert!(prompt.contains("around 300-400 words"));
    }
}
