//! 文档解析服务 - 业务能力层
//!
//! 只负责把下载的文件转换成一段纯文本

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// 文档解析服务
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 按扩展名读取文件内容
    ///
    /// - `pdf`: 提取所有页面的文本
    /// - `csv` / `json` / `txt`: 原样读取
    /// - 其他格式：返回一段说明文字（不视为错误）
    pub async fn load(&self, path: &Path, ext: &str) -> Result<String> {
        let ext = ext.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => {
                let text = self.extract_pdf_text(path).await?;
                info!("📄 从 PDF 中提取了 {} 个字符", text.chars().count());
                Ok(text)
            }
            "csv" | "json" | "txt" => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("读取文件失败: {}", path.display()))?;
                info!(
                    "📄 从 {} 文件中读取了 {} 个字符",
                    ext.to_ascii_uppercase(),
                    text.chars().count()
                );
                Ok(text)
            }
            other => {
                let placeholder = format!("File downloaded but format {} needs manual parsing.", other);
                warn!("⚠️ 暂不支持的文件格式: {}", other);
                Ok(placeholder)
            }
        }
    }

    /// 提取 PDF 中所有页面的文本
    pub async fn extract_pdf_text(&self, path: &Path) -> Result<String> {
        debug!("正在解析 PDF: {}", path.display());
        let path: PathBuf = path.to_path_buf();

        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
            .await
            .context("PDF 解析任务异常退出")?
            .map_err(|e| anyhow::anyhow!("无法解析 PDF 文件: {:?}", e))?;

        Ok(text)
    }
}
