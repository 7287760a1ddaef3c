//! Scratch File - 上传音频的临时文件
//!
//! 把创建与删除配对在一个类型里：`remove()` 显式删除，
//! 未显式删除时由 Drop 兜底，保证任何退出路径下临时文件
//! 恰好被删除一次

use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// 请求作用域内的临时文件
///
/// 文件名格式: `temp_{sanitized_hint}_{uuid}`，uuid 保证并发请求
/// 在共享目录下不会碰撞
pub struct ScratchFile {
    path: PathBuf,
    removed: bool,
}

impl ScratchFile {
    /// 把上传内容写入目录下的唯一临时文件
    pub async fn create(
        dir: &Path,
        filename_hint: &str,
        data: &[u8],
    ) -> Result<Self, std::io::Error> {
        fs::create_dir_all(dir).await?;

        let name = format!(
            "temp_{}_{}",
            sanitize_hint(filename_hint),
            Uuid::new_v4().simple()
        );
        let path = dir.join(name);

        fs::write(&path, data).await?;

        tracing::debug!(
            path = %path.display(),
            size = data.len(),
            "Scratch file created"
        );

        Ok(Self {
            path,
            removed: false,
        })
    }

    /// 临时文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读回文件内容
    pub async fn read(&self) -> Result<Vec<u8>, std::io::Error> {
        fs::read(&self.path).await
    }

    /// 显式删除临时文件
    ///
    /// 消耗 self，之后 Drop 不再重复删除
    pub async fn remove(mut self) -> Result<(), std::io::Error> {
        self.removed = true;
        fs::remove_file(&self.path).await
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        // Drop 里没有异步运行时，退回同步删除
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove scratch file on drop"
                );
            }
        }
    }
}

/// 清洗文件名提示，只保留安全字符
///
/// 提示只用于可读性，唯一性由 uuid 保证
fn sanitize_hint(hint: &str) -> String {
    let cleaned: String = hint
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_create_write_read_remove() {
        let dir = tempdir().unwrap();
        let scratch = ScratchFile::create(dir.path(), "voice.wav", b"audio bytes")
            .await
            .unwrap();

        assert!(scratch.path().exists());
        assert_eq!(scratch.read().await.unwrap(), b"audio bytes");

        let path = scratch.path().to_path_buf();
        scratch.remove().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = tempdir().unwrap();
        let path;
        {
            let scratch = ScratchFile::create(dir.path(), "voice.wav", b"data")
                .await
                .unwrap();
            path = scratch.path().to_path_buf();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_concurrent_creates_use_distinct_paths() {
        let dir = tempdir().unwrap();
        let mut handles = Vec::new();
        for _ in 0..16 {
            let dir_path = dir.path().to_path_buf();
            handles.push(tokio::spawn(async move {
                ScratchFile::create(&dir_path, "same-hint.wav", b"data")
                    .await
                    .unwrap()
            }));
        }

        let mut paths = std::collections::HashSet::new();
        let mut files = Vec::new();
        for handle in handles {
            let scratch = handle.await.unwrap();
            paths.insert(scratch.path().to_path_buf());
            files.push(scratch);
        }

        // 相同提示名的并发请求也必须拿到不同路径
        assert_eq!(paths.len(), 16);
    }

    #[test]
    fn test_sanitize_hint() {
        assert_eq!(sanitize_hint("voice.wav"), "voice.wav");
        assert_eq!(sanitize_hint("my voice/../x.wav"), "my_voice_.._x.wav");
        assert_eq!(sanitize_hint(""), "upload");
    }
}
