//! 临时文件 - 基础设施层
//!
//! 下载的数据文件只在一轮内有效，离开作用域时自动删除

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// 作用域内有效的临时文件路径
///
/// 只负责路径和清理，不负责创建文件
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    /// 在 `dir` 下生成 `{stem}.{ext}` 形式的路径
    ///
    /// 扩展名只保留 ASCII 字母和数字
    pub fn new(dir: &Path, stem: &str, ext: &str) -> Self {
        let ext: String = ext
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        let ext = if ext.is_empty() { "bin".to_string() } else { ext };

        Self {
            path: dir.join(format!("{}.{}", stem, ext)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("🗑️ 已清理临时文件: {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("清理临时文件失败 ({}): {}", self.path.display(), e),
        }
    }
}
