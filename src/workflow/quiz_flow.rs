//! 单题处理流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整处理流程
//!
//! 流程顺序：
//! 1. 渲染页面 → 题目说明 + 提交地址
//! 2. LLM 生成计划（失败时降级为 ERROR 计划，不中断）
//! 3. 按任务类型获取数据（下载 / 页面文本）
//! 4. LLM 计算答案 → 类型转换
//! 5. 提交答案

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::Submitter;
use crate::error::{AppError, AppResult};
use crate::infrastructure::TempFile;
use crate::models::{coerce_answer, Plan, QuizRound, SubmissionPayload, TaskType};
use crate::services::{AnswerOracle, DocumentExtractor, PageReader, PlanOracle};
use crate::utils::logging::truncate_text;
use crate::workflow::download_link::find_download_link;
use crate::workflow::round_ctx::RoundCtx;

const SCRAPE_INSTRUCTION: &str = "Extract and calculate the final answer based on these instructions.";
const ANALYZE_INSTRUCTION: &str =
    "Solve the quiz based on the provided instructions. Output ONLY the final answer value.";

/// 单题处理流程
///
/// - 编排一道题的完整处理流程
/// - 任何一步失败都返回对应阶段的错误，由编排层决定停止
/// - 不持有浏览器，只依赖能力接口
pub struct QuizFlow {
    page_reader: Arc<dyn PageReader>,
    planner: Arc<dyn PlanOracle>,
    answerer: Arc<dyn AnswerOracle>,
    submitter: Arc<dyn Submitter>,
    extractor: DocumentExtractor,
    temp_dir: PathBuf,
}

impl QuizFlow {
    /// 创建新的单题处理流程
    pub fn new(
        page_reader: Arc<dyn PageReader>,
        planner: Arc<dyn PlanOracle>,
        answerer: Arc<dyn AnswerOracle>,
        submitter: Arc<dyn Submitter>,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            page_reader,
            planner,
            answerer,
            submitter,
            extractor: DocumentExtractor::new(),
            temp_dir: temp_dir.into(),
        }
    }

    /// 处理一道题，返回本轮的完整记录
    pub async fn run(&self, ctx: &RoundCtx) -> AppResult<QuizRound> {
        let mut round = QuizRound::new(&ctx.quiz_url);

        // ========== FETCHING ==========
        let page = self
            .page_reader
            .read_quiz(&ctx.quiz_url)
            .await
            .map_err(|e| AppError::fetch_failed(&ctx.quiz_url, format!("{:#}", e)))?;

        let submit_url = page
            .submit_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                warn!("{} 题目说明预览: {}", ctx, truncate_text(&page.instructions, 200));
                AppError::fetch_failed(&ctx.quiz_url, "页面中没有找到提交地址")
            })?;

        info!(
            "{} ✅ 已获取题目说明 ({} 字符)",
            ctx,
            page.instructions.chars().count()
        );
        info!("{} 📤 提交地址: {}", ctx, submit_url);

        round.instructions = page.instructions;
        round.submit_url = submit_url;

        // ========== PLANNING ==========
        let plan = match self.planner.plan(&round.instructions).await {
            Ok(plan) => plan,
            Err(e) => {
                let err = AppError::Plan(format!("{:#}", e));
                warn!("{} ⚠️ {}，按直接分析处理", ctx, err);
                Plan::degraded(format!("{:#}", e))
            }
        };
        info!("{} 🎯 任务类型: {}", ctx, plan.task_type);
        for (i, step) in plan.steps.iter().enumerate() {
            debug!("{}   {}. {}", ctx, i + 1, step);
        }

        // ========== EXECUTING ==========
        let (data, instruction) = match plan.task_type {
            TaskType::Download => {
                let data = self.acquire_download(ctx, &round.instructions).await?;
                (data, round.instructions.clone())
            }
            TaskType::Scrape => (round.instructions.clone(), SCRAPE_INSTRUCTION.to_string()),
            TaskType::Analyze | TaskType::Visualize | TaskType::Error => {
                (round.instructions.clone(), ANALYZE_INSTRUCTION.to_string())
            }
        };
        round.plan = Some(plan);

        // ========== ANSWERING ==========
        let raw_answer = self
            .answerer
            .answer(&data, &instruction)
            .await
            .map_err(|e| AppError::answer_failed(format!("{:#}", e)))?;

        if raw_answer.trim().is_empty() {
            return Err(AppError::answer_failed("LLM 返回了空答案"));
        }
        info!("{} 💡 LLM 答案: {}", ctx, truncate_text(&raw_answer, 200));

        let answer = coerce_answer(&raw_answer);
        round.raw_answer = Some(raw_answer);

        // ========== SUBMITTING ==========
        info!("{} 📤 提交答案: {} (类型: {})", ctx, answer, answer.kind());

        let payload = SubmissionPayload {
            email: ctx.email.clone(),
            secret: ctx.secret.clone(),
            url: ctx.quiz_url.clone(),
            answer: answer.clone(),
        };
        round.answer = Some(answer);

        let result = self
            .submitter
            .submit(&round.submit_url, &payload)
            .await
            .map_err(|e| AppError::submission_failed(&round.submit_url, format!("{:#}", e)))?;

        if result.correct {
            info!("{} ✅ 回答正确", ctx);
        } else {
            warn!("{} ❌ 回答错误", ctx);
            if let Some(reason) = &result.reason {
                warn!("{}    原因: {}", ctx, reason);
            }
        }
        round.submission = Some(result);

        Ok(round)
    }

    /// 下载并解析题目中的数据文件
    ///
    /// 临时文件在函数返回时删除（无论成功与否）
    async fn acquire_download(&self, ctx: &RoundCtx, instructions: &str) -> AppResult<String> {
        let link = find_download_link(instructions, Some(&ctx.quiz_url))
            .ok_or_else(|| AppError::acquisition_failed("题目说明中没有找到可下载的文件链接"))?;

        info!("{} 📥 下载文件: {}", ctx, link.url);

        let temp = TempFile::new(&self.temp_dir, &ctx.temp_stem(), &link.ext);

        self.page_reader
            .download(&link.url, temp.path())
            .await
            .map_err(|e| AppError::acquisition_failed(format!("下载 {} 失败: {:#}", link.url, e)))?;

        debug!("{} 文件已保存到 {}", ctx, temp.path().display());

        let data = self
            .extractor
            .load(temp.path(), &link.ext)
            .await
            .map_err(|e| AppError::acquisition_failed(format!("{:#}", e)))?;

        Ok(data)
    }
}
