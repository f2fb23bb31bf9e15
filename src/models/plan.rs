//! 解题计划
//!
//! 由 LLM 对题目说明进行分类后得到。只有 `task_type` 决定后续分支，
//! 步骤列表仅用于日志诊断。

use std::fmt::Display;

use serde::Deserialize;
use serde_json::Value as JsonValue;

/// 任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    /// 需要下载并解析文件
    Download,
    /// 页面内容即数据
    Scrape,
    /// 直接推理
    Analyze,
    /// 可视化类题目（按直接推理处理）
    Visualize,
    /// 计划生成失败（按直接推理处理）
    Error,
}

impl TaskType {
    /// 从 LLM 返回的标签解析任务类型
    ///
    /// 大小写不敏感，无法识别的标签按 `Analyze` 处理
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "DOWNLOAD" => TaskType::Download,
            "SCRAPE" => TaskType::Scrape,
            "ANALYZE" | "ANALYSE" => TaskType::Analyze,
            "VISUALIZE" | "VISUALISE" => TaskType::Visualize,
            "ERROR" => TaskType::Error,
            _ => TaskType::Analyze,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Download => "DOWNLOAD",
            TaskType::Scrape => "SCRAPE",
            TaskType::Analyze => "ANALYZE",
            TaskType::Visualize => "VISUALIZE",
            TaskType::Error => "ERROR",
        }
    }
}

impl Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 解题计划
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub task_type: TaskType,
    pub steps: Vec<String>,
}

/// LLM 返回的原始 JSON 结构
#[derive(Debug, Deserialize)]
struct RawPlan {
    #[serde(default)]
    task_type: Option<String>,
    #[serde(default)]
    plan: Vec<JsonValue>,
}

impl Plan {
    pub fn new(task_type: TaskType, steps: Vec<String>) -> Self {
        Self { task_type, steps }
    }

    /// 计划生成失败时的降级计划
    pub fn degraded(reason: impl Display) -> Self {
        Self {
            task_type: TaskType::Error,
            steps: vec![format!("LLM failed to generate plan: {}", reason)],
        }
    }

    /// 解析 LLM 返回的计划 JSON
    ///
    /// 容忍代码块包裹或前后夹杂的说明文字；缺少 `task_type` 时视为 ANALYZE。
    pub fn parse(response: &str) -> anyhow::Result<Self> {
        let json_text = extract_json_object(response)
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容中没有 JSON 对象"))?;

        let raw: RawPlan = serde_json::from_str(json_text)?;

        let task_type = raw
            .task_type
            .as_deref()
            .map(TaskType::from_label)
            .unwrap_or(TaskType::Analyze);

        let steps = raw
            .plan
            .into_iter()
            .map(|step| match step {
                JsonValue::String(s) => s,
                other => other.to_string(),
            })
            .collect();

        Ok(Self { task_type, steps })
    }
}

/// 截取第一个 `{` 到最后一个 `}` 之间的内容
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
