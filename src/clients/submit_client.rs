//! 答案提交客户端
//!
//! 封装向题目服务端 POST 答案的调用逻辑

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::models::{SubmissionPayload, SubmissionResult};

/// 答案提交能力
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, submit_url: &str, payload: &SubmissionPayload) -> Result<SubmissionResult>;
}

/// 基于 reqwest 的提交客户端
pub struct SubmitClient {
    http: reqwest::Client,
}

impl SubmitClient {
    /// 创建新的提交客户端
    ///
    /// `timeout` 是单次提交的硬上限，不重试
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("创建 HTTP 客户端失败")?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Submitter for SubmitClient {
    async fn submit(&self, submit_url: &str, payload: &SubmissionPayload) -> Result<SubmissionResult> {
        debug!("提交 Payload: {}", serde_json::to_string(payload)?);

        let response = self
            .http
            .post(submit_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow::anyhow!("提交超时: {}", e)
                } else {
                    anyhow::anyhow!("提交请求失败: {}", e)
                }
            })?;

        let status = response.status();
        let body = response.text().await.context("读取提交响应失败")?;
        debug!("提交响应 ({}): {}", status, body);

        // 服务端答错时也可能返回非 2xx，只要响应体是 JSON 就照常解析
        let result: SubmissionResult = serde_json::from_str(&body)
            .with_context(|| format!("无法解析提交响应 (HTTP {}): {}", status, body))?;

        Ok(result)
    }
}
