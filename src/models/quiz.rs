use serde::{Deserialize, Serialize};

use crate::models::{AnswerValue, Plan, SubmissionResult};

/// `POST /solve-quiz` 的请求体
#[derive(Debug, Clone, Deserialize)]
pub struct QuizTask {
    pub email: String,
    pub secret: String,
    pub url: String,
}

/// 浏览器渲染后的题目页面
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizPage {
    /// 页面可见文本（题目说明）
    pub instructions: String,
    /// 提交答案的地址
    pub submit_url: Option<String>,
}

/// 一轮答题的记录
///
/// 每轮新建，结果决定后即丢弃
#[derive(Debug, Clone, Default)]
pub struct QuizRound {
    pub quiz_url: String,
    pub instructions: String,
    pub submit_url: String,
    pub plan: Option<Plan>,
    pub raw_answer: Option<String>,
    pub answer: Option<AnswerValue>,
    pub submission: Option<SubmissionResult>,
}

impl QuizRound {
    pub fn new(quiz_url: impl Into<String>) -> Self {
        Self {
            quiz_url: quiz_url.into(),
            ..Default::default()
        }
    }
}

/// 一次请求处理结束后返回给调用方的汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub status: String,
    /// 总耗时（秒）
    pub total_time: f64,
    pub quizzes_attempted: usize,
    pub final_url_attempted: String,
}
