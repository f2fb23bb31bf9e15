//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责应用生命周期和会话调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用生命周期
//! - 启动浏览器（Browser，进程内只启动一次）
//! - 创建 LLM 客户端、提交客户端，注入到 QuizFlow
//! - 启动 HTTP 服务，Ctrl-C 时优雅退出
//!
//! ### `session` - 答题会话
//! - 一次请求对应一个 Session
//! - 每轮开始前检查时间预算
//! - 根据提交结果决定继续下一题还是停止
//! - 输出会话统计信息
//!
//! ## 层次关系
//!
//! ```text
//! app (HTTP 服务 + 资源)
//!     ↓
//! session::QuizSolver (处理一条题目链)
//!     ↓
//! workflow::QuizFlow (处理单道题)
//!     ↓
//! services / clients (能力层：页面 / LLM / 提交)
//!     ↓
//! infrastructure (基础设施：JsExecutor / TempFile)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有 Browser
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod app;
pub mod session;

// 重新导出主要类型
pub use app::App;
pub use session::{QuizSolver, Session, TimeBudget};
