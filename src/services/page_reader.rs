//! 页面读取服务 - 业务能力层
//!
//! 只负责"渲染题目页面 / 下载文件"能力，不关心流程

use std::path::Path;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::Browser;
use regex::Regex;
use reqwest::Url;
use tracing::{debug, info};

use crate::config::Config;
use crate::infrastructure::JsExecutor;
use crate::models::QuizPage;

/// 页面读取能力
#[async_trait]
pub trait PageReader: Send + Sync {
    /// 渲染题目页面，返回页面文本和提交地址
    async fn read_quiz(&self, url: &str) -> Result<QuizPage>;

    /// 下载文件并保存到 `dest`
    async fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// 基于无头浏览器的页面读取服务
///
/// 职责：
/// - 每次调用新开一个标签页，用完即关
/// - 不认识计划 / 答案
/// - 浏览器本身由进程持有，这里只借用
pub struct BrowserPageReader {
    browser: Arc<Browser>,
    navigation_timeout: Duration,
    selector_timeout: Duration,
}

impl BrowserPageReader {
    pub fn new(browser: Arc<Browser>, config: &Config) -> Self {
        Self {
            browser,
            navigation_timeout: config.navigation_timeout(),
            selector_timeout: config.selector_timeout(),
        }
    }

    async fn open_tab(&self) -> Result<JsExecutor> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("创建新标签页失败")?;
        Ok(JsExecutor::new(page))
    }

    async fn render(&self, executor: &JsExecutor, url: &str) -> Result<String> {
        executor.goto(url, self.navigation_timeout).await?;
        executor.wait_for_body(self.selector_timeout).await?;
        executor.body_text().await
    }

    async fn fetch_into(&self, executor: &JsExecutor, url: &str, dest: &Path) -> Result<()> {
        // 先进入文件所在站点，页内 fetch 才能带上同源 cookie
        if let Some(origin) = origin_of(url) {
            if let Err(e) = executor.goto(&origin, self.navigation_timeout).await {
                debug!("进入 {} 失败，直接下载: {}", origin, e);
            }
        }

        let bytes = executor.fetch_bytes(url, self.navigation_timeout).await?;
        tokio::fs::write(dest, &bytes)
            .await
            .with_context(|| format!("写入文件失败: {}", dest.display()))?;
        Ok(())
    }
}

#[async_trait]
impl PageReader for BrowserPageReader {
    async fn read_quiz(&self, url: &str) -> Result<QuizPage> {
        info!("🌐 正在渲染题目页面: {}", url);

        let executor = self.open_tab().await?;
        let rendered = self.render(&executor, url).await;
        executor.close().await;

        let instructions = rendered?;
        let submit_url = extract_submit_url(&instructions);
        debug!(
            "页面文本 {} 字符，提交地址: {:?}",
            instructions.chars().count(),
            submit_url
        );

        Ok(QuizPage {
            instructions,
            submit_url,
        })
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        info!("📥 正在下载文件: {}", url);

        let executor = self.open_tab().await?;
        let result = self.fetch_into(&executor, url, dest).await;
        executor.close().await;

        result
    }
}

static SUBMIT_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)Post your answer to (https?://[^\s"]+)"#).expect("提交地址正则非法")
});

/// 从页面文本中提取提交地址
///
/// 匹配 "Post your answer to https://..."（大小写不敏感）
pub fn extract_submit_url(text: &str) -> Option<String> {
    SUBMIT_URL_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|u| !u.is_empty())
}

/// 文件 URL 所在站点的根地址
fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let origin = parsed.origin();
    origin.is_tuple().then(|| format!("{}/", origin.ascii_serialization()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_submit_url() {
        let text = "Q834. Sum the values.\nPost your answer to https://quiz.example.com/submit with this JSON payload";
        assert_eq!(
            extract_submit_url(text).as_deref(),
            Some("https://quiz.example.com/submit")
        );
    }

    #[test]
    fn test_extract_submit_url_case_insensitive() {
        let text = "post YOUR answer TO http://localhost:9000/answer\"";
        assert_eq!(
            extract_submit_url(text).as_deref(),
            Some("http://localhost:9000/answer")
        );
    }

    #[test]
    fn test_extract_submit_url_missing() {
        assert_eq!(extract_submit_url("Submit somewhere else"), None);
        assert_eq!(extract_submit_url("Post your answer to /relative/path"), None);
    }

    #[test]
    fn test_origin_of() {
        assert_eq!(
            origin_of("https://x.example/files/data.pdf").as_deref(),
            Some("https://x.example/")
        );
        assert_eq!(
            origin_of("http://localhost:8080/a.csv").as_deref(),
            Some("http://localhost:8080/")
        );
        assert_eq!(origin_of("not a url"), None);
        assert_eq!(origin_of("data:text/plain,hello"), None);
    }
}
