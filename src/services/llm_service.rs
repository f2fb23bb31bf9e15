//! LLM 服务 - 业务能力层
//!
//! 只负责"LLM 判断"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::Plan;
use crate::services::oracle::{AnswerOracle, PlanOracle};

const PLAN_SYSTEM_PROMPT: &str = "You are an expert Data Scientist. Your task is to analyze a raw quiz description \
and determine the exact plan to solve it. Respond with ONLY a single JSON object with the keys \
'task_type' and 'plan'. The 'plan' should be a concise, sequential list of steps needed. \
The 'task_type' must be 'DOWNLOAD', 'SCRAPE', 'ANALYZE', or 'VISUALIZE'.";

const ANSWER_SYSTEM_PROMPT: &str = "You are a calculation and analysis assistant. Solve the user's request \
based ONLY on the provided data. Output ONLY the final answer as a single value.";

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 生成解题计划
/// - 调用 LLM API 计算最终答案
/// - 进程启动时创建一次，由编排层共享
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息
    /// - `temperature`: 采样温度
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已去除首尾空白）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: &str,
        temperature: f32,
    ) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_message)
            .build()?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;

        let messages = vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ];

        // 构建请求
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(temperature)
            .build()?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl PlanOracle for LlmService {
    async fn plan(&self, instructions: &str) -> Result<Plan> {
        info!("🧠 正在生成解题计划...");
        let user_message = build_plan_message(instructions);
        let response = self.send_to_llm(&user_message, PLAN_SYSTEM_PROMPT, 0.1).await?;
        debug!("计划原文: {}", response);
        Plan::parse(&response)
    }
}

#[async_trait]
impl AnswerOracle for LlmService {
    async fn answer(&self, data: &str, instruction: &str) -> Result<String> {
        info!("🤖 正在根据数据计算答案...");
        let user_message = build_answer_message(data, instruction);
        self.send_to_llm(&user_message, ANSWER_SYSTEM_PROMPT, 0.0).await
    }
}

/// 构建计划请求的用户消息
fn build_plan_message(instructions: &str) -> String {
    format!("The quiz instructions are:\n\n---\n{}\n---", instructions)
}

/// 构建答案请求的用户消息
fn build_answer_message(data: &str, instruction: &str) -> String {
    format!("DATA:\n{}\n\nINSTRUCTION: {}", data, instruction)
}
