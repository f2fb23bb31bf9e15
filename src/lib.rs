//! # Quiz Solver
//!
//! 一个自动解答网页题目链的 Rust 服务
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（标签页、临时文件），只暴露能力
//! - `JsExecutor` - 标签页的唯一持有者，提供导航、取文本、页内下载
//! - `TempFile` - 下载文件的临时路径，离开作用域自动删除
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/` - 描述"我能做什么"
//! - `PageReader` - 渲染题目页面、下载文件
//! - `DocumentExtractor` - 把下载的文件转成文本
//! - `LlmService` - 生成计划、计算答案
//! - `clients/SubmitClient` - 提交答案
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整处理流程
//! - `RoundCtx` - 上下文封装（session_id + round）
//! - `QuizFlow` - 流程编排（fetch → plan → execute → answer → submit）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session` - 答题会话，时间预算和题目链
//! - `orchestrator/app` - 应用生命周期和 HTTP 服务
//!
//! ## 模块结构

pub mod api;
pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::launch_headless_browser;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{JsExecutor, TempFile};
pub use models::{AnswerValue, Plan, QuizTask, SessionSummary, SubmissionResult, TaskType};
pub use orchestrator::{App, QuizSolver, Session, TimeBudget};
pub use workflow::{QuizFlow, RoundCtx};
