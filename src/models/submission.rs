//! 答案提交的请求与响应

use serde::{Deserialize, Serialize};

use crate::models::AnswerValue;

/// 提交给题目服务端的请求体
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionPayload {
    pub email: String,
    pub secret: String,
    /// 当前题目的 URL
    pub url: String,
    pub answer: AnswerValue,
}

/// 服务端对答案的判定结果
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubmissionResult {
    #[serde(default)]
    pub correct: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl SubmissionResult {
    /// 下一题的 URL（空字符串视为没有）
    pub fn next_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

/// 一轮结束后的走向
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// 继续下一题（无论本题是否答对）
    Continue(String),
    /// 没有下一题，结束
    Stop,
}

impl Transition {
    pub fn from_submission(result: &SubmissionResult) -> Self {
        match result.next_url() {
            Some(url) => Transition::Continue(url.to_string()),
            None => Transition::Stop,
        }
    }
}
