//! JS 执行器 - 基础设施层
//!
//! 持有一个浏览器标签页，只暴露"导航 / 读文本 / 页内下载 / 执行 JS"的能力

use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// 页内 fetch 的返回结构
#[derive(Debug, Deserialize)]
struct FetchedFile {
    data: Option<String>,
    error: Option<String>,
}

/// JS 执行器
///
/// 职责：
/// - 持有一个 Page 资源（一次读取或下载对应一个标签页）
/// - 不认识题目 / 计划
/// - 不处理业务流程
///
/// 未调用 [`close`](Self::close) 就被丢弃时（例如所在的 future 被取消），
/// 会在后台关闭标签页，避免共享浏览器中堆积标签页
pub struct JsExecutor {
    page: Page,
    closed: bool,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self {
            page,
            closed: false,
        }
    }

    /// 在超时时间内导航到指定 URL
    pub async fn goto(&self, url: &str, limit: Duration) -> Result<()> {
        debug!("导航到: {} (超时 {:?})", url, limit);
        timeout(limit, self.page.goto(url))
            .await
            .with_context(|| format!("导航到 {} 超时", url))?
            .with_context(|| format!("导航到 {} 失败", url))?;
        Ok(())
    }

    /// 等待 body 元素出现
    pub async fn wait_for_body(&self, limit: Duration) -> Result<()> {
        timeout(limit, async {
            loop {
                if self.page.find_element("body").await.is_ok() {
                    return;
                }
                sleep(Duration::from_millis(250)).await;
            }
        })
        .await
        .context("等待页面 body 超时")
    }

    /// 读取页面可见文本
    pub async fn body_text(&self) -> Result<String> {
        self.eval_as::<String>("document.body ? document.body.innerText : ''")
            .await
            .context("读取页面文本失败")
    }

    /// 在页面内 fetch 指定文件并返回字节
    ///
    /// 文件经 FileReader 转成 base64 传回，再在本地解码
    pub async fn fetch_bytes(&self, url: &str, limit: Duration) -> Result<Vec<u8>> {
        let url_literal = serde_json::to_string(url)?;
        let js_code = format!(
            r#"
            (async () => {{
                try {{
                    const res = await fetch({}, {{ credentials: "include" }});
                    if (!res.ok) {{
                        return {{ error: "HTTP " + res.status }};
                    }}
                    const blob = await res.blob();
                    return await new Promise((resolve) => {{
                        const reader = new FileReader();
                        reader.onloadend = () => resolve({{ data: String(reader.result).split(",")[1] || "" }});
                        reader.onerror = () => resolve({{ error: "读取文件内容失败" }});
                        reader.readAsDataURL(blob);
                    }});
                }} catch (err) {{
                    return {{ error: String(err) }};
                }}
            }})()
            "#,
            url_literal
        );

        let fetched = timeout(limit, self.eval_as::<FetchedFile>(js_code))
            .await
            .with_context(|| format!("下载 {} 超时", url))??;

        if let Some(err) = fetched.error {
            anyhow::bail!("下载 {} 失败: {}", url, err);
        }

        let data = fetched.data.unwrap_or_default();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(data.as_bytes())
            .context("无法解码 base64 文件内容")?;

        debug!("页内下载完成: {} ({} 字节)", url, bytes.len());
        Ok(bytes)
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 关闭标签页
    pub async fn close(mut self) {
        if let Err(e) = self.page.clone().close().await {
            debug!("关闭标签页失败: {}", e);
        }
        self.closed = true;
    }
}

impl Drop for JsExecutor {
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        let page = self.page.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("标签页未正常关闭，转入后台关闭");
                handle.spawn(async move {
                    if let Err(e) = page.close().await {
                        debug!("后台关闭标签页失败: {}", e);
                    }
                });
            }
            Err(_) => warn!("没有可用的 tokio 运行时，标签页未能关闭"),
        }
    }
}
