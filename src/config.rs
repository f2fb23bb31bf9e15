use std::path::PathBuf;
use std::time::Duration;

use crate::orchestrator::TimeBudget;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    // --- 学生凭证 ---
    pub student_email: String,
    pub student_secret: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 时间预算 ---
    /// 单次请求的总时间预算（秒）
    pub time_budget_secs: u64,
    /// 安全余量（秒），剩余时间不足时不再开始新的一轮
    pub safety_margin_secs: u64,
    /// 页面导航超时（秒）
    pub navigation_timeout_secs: u64,
    /// 等待页面内容超时（秒）
    pub selector_timeout_secs: u64,
    /// 提交答案超时（秒）
    pub submit_timeout_secs: u64,
    /// 下载文件的临时目录
    pub temp_dir: PathBuf,
    /// 浏览器可执行文件路径（为空时自动查找）
    pub chrome_executable: Option<PathBuf>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            student_email: String::new(),
            student_secret: String::new(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            time_budget_secs: 180,
            safety_margin_secs: 30,
            navigation_timeout_secs: 60,
            selector_timeout_secs: 30,
            submit_timeout_secs: 30,
            temp_dir: std::env::temp_dir(),
            chrome_executable: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        // .env 文件可选
        let _ = dotenvy::dotenv();

        let default = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(default.host),
            port: parse_env("PORT").unwrap_or(default.port),
            student_email: std::env::var("STUDENT_EMAIL").unwrap_or(default.student_email),
            student_secret: std::env::var("STUDENT_SECRET").unwrap_or(default.student_secret),
            llm_api_key: std::env::var("OPENAI_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL").unwrap_or(default.llm_model_name),
            time_budget_secs: parse_env("TIME_BUDGET_SECS").unwrap_or(default.time_budget_secs),
            safety_margin_secs: parse_env("SAFETY_MARGIN_SECS").unwrap_or(default.safety_margin_secs),
            navigation_timeout_secs: parse_env("NAVIGATION_TIMEOUT_SECS").unwrap_or(default.navigation_timeout_secs),
            selector_timeout_secs: parse_env("SELECTOR_TIMEOUT_SECS").unwrap_or(default.selector_timeout_secs),
            submit_timeout_secs: parse_env("SUBMIT_TIMEOUT_SECS").unwrap_or(default.submit_timeout_secs),
            temp_dir: std::env::var("QUIZ_TEMP_DIR").map(PathBuf::from).unwrap_or(default.temp_dir),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().filter(|v| !v.is_empty()).map(PathBuf::from),
            verbose_logging: parse_env("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
        }
    }

    /// 服务监听地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn time_budget(&self) -> TimeBudget {
        TimeBudget::new(
            Duration::from_secs(self.time_budget_secs),
            Duration::from_secs(self.safety_margin_secs),
        )
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_secs(self.selector_timeout_secs)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    /// 校验请求中的邮箱和密钥是否与配置一致
    ///
    /// 未配置密钥时一律拒绝
    pub fn credentials_match(&self, email: &str, secret: &str) -> bool {
        !self.student_secret.is_empty() && email == self.student_email && secret == self.student_secret
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
