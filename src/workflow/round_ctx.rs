//! 答题轮次上下文
//!
//! 封装"我正在处理哪个会话的第几题"这一信息

use std::fmt::Display;

/// 答题轮次上下文
///
/// 包含处理单个题目所需的所有上下文信息
#[derive(Debug, Clone)]
pub struct RoundCtx {
    /// 会话ID（区分并发请求的临时文件）
    pub session_id: String,

    /// 本轮序号（从1开始）
    pub round: usize,

    /// 当前题目 URL
    pub quiz_url: String,

    /// 学生邮箱
    pub email: String,

    /// 学生密钥
    pub secret: String,
}

impl RoundCtx {
    /// 创建新的轮次上下文
    pub fn new(
        session_id: impl Into<String>,
        round: usize,
        quiz_url: impl Into<String>,
        email: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            round,
            quiz_url: quiz_url.into(),
            email: email.into(),
            secret: secret.into(),
        }
    }

    /// 本轮临时文件名（不含扩展名）
    pub fn temp_stem(&self) -> String {
        format!(
            "quiz_data_{}_{}_{}",
            std::process::id(),
            self.session_id,
            self.round
        )
    }
}

impl Display for RoundCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[会话 #{} 第{}题]", self.session_id, self.round)
    }
}
