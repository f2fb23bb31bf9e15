use thiserror::Error;

/// 应用程序错误类型
///
/// 每一轮答题中的错误都会在编排层被捕获并转换为"停止循环"，
/// 只有鉴权错误会直接返回给调用方。
#[derive(Debug, Error)]
pub enum AppError {
    /// 邮箱或密钥与配置不一致
    #[error("鉴权失败: 邮箱或密钥不匹配")]
    Auth,

    /// 获取题目页面失败，或页面中没有提交地址
    #[error("获取题目失败 ({url}): {reason}")]
    Fetch { url: String, reason: String },

    /// LLM 生成计划失败（降级为 ERROR 计划，不会中断循环）
    #[error("生成计划失败: {0}")]
    Plan(String),

    /// 下载或解析数据文件失败
    #[error("获取数据失败: {0}")]
    Acquisition(String),

    /// LLM 未能给出答案
    #[error("生成答案失败: {0}")]
    Answer(String),

    /// 提交答案失败（超时或网络错误）
    #[error("提交答案失败 ({endpoint}): {reason}")]
    Submission { endpoint: String, reason: String },

    /// 会话任务异常退出
    #[error("会话任务异常退出: {0}")]
    Session(String),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建获取题目错误
    pub fn fetch_failed(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        AppError::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// 创建数据获取错误
    pub fn acquisition_failed(reason: impl std::fmt::Display) -> Self {
        AppError::Acquisition(reason.to_string())
    }

    /// 创建答案生成错误
    pub fn answer_failed(reason: impl std::fmt::Display) -> Self {
        AppError::Answer(reason.to_string())
    }

    /// 创建提交错误
    pub fn submission_failed(endpoint: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        AppError::Submission {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    /// 错误所属阶段（用于日志）
    pub fn stage(&self) -> &'static str {
        match self {
            AppError::Auth => "AUTH",
            AppError::Fetch { .. } => "FETCHING",
            AppError::Plan(_) => "PLANNING",
            AppError::Acquisition(_) => "EXECUTING",
            AppError::Answer(_) => "ANSWERING",
            AppError::Submission { .. } => "SUBMITTING",
            AppError::Session(_) => "SESSION",
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
