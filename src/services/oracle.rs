//! LLM 能力接口
//!
//! 编排层只依赖这两个接口，具体实现由 [`LlmService`](super::LlmService) 提供，
//! 测试中可替换为脚本化的实现。

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Plan;

/// 题目分类与计划生成
#[async_trait]
pub trait PlanOracle: Send + Sync {
    async fn plan(&self, instructions: &str) -> Result<Plan>;
}

/// 根据数据和指令计算最终答案
#[async_trait]
pub trait AnswerOracle: Send + Sync {
    async fn answer(&self, data: &str, instruction: &str) -> Result<String>;
}
