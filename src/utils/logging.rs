//! 日志工具模块
//!
//! 提供日志初始化和格式化输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化日志
///
/// `RUST_LOG` 优先；未设置时默认 info，`verbose` 为真时为 debug
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - LLM 答题服务");
    info!("🌐 监听地址: {}", config.bind_addr());
    info!("🤖 模型: {}", config.llm_model_name);
    info!(
        "⏱️  时间预算: {}s (安全余量 {}s)",
        config.time_budget_secs, config.safety_margin_secs
    );
    info!("{}", "=".repeat(60));
}

/// 记录会话开始信息
pub fn log_session_start(session_id: &str, url: &str, email: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📨 收到新任务 #{}", session_id);
    info!("URL: {}", url);
    info!("Email: {}", email);
    info!("{}", "=".repeat(60));
}

/// 记录每一轮开始信息
pub fn log_round_start(round: usize, url: &str, elapsed_secs: f64, budget_secs: u64) {
    info!("\n{}", "─".repeat(60));
    info!("🔍 第 {} 题: {}", round, url);
    info!("⏱️  已用时间: {:.1}s / {}s", elapsed_secs, budget_secs);
    info!("{}", "─".repeat(60));
}

/// 打印会话统计信息
pub fn log_session_complete(total_secs: f64, attempted: usize, final_url: &str) {
    info!("\n{}", "=".repeat(60));
    info!("🏁 任务完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("⏱️  总耗时: {:.2} 秒", total_secs);
    info!("📊 尝试题目数: {}", attempted);
    info!("🔗 最后的题目: {}", final_url);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghij", 4), "abcd...");
        // 按字符截断，不会切断多字节字符
        assert_eq!(truncate_text("题目说明很长", 2), "题目...");
    }
}
