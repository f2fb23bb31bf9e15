//! 答题会话编排器 - 编排层
//!
//! ## 职责
//!
//! 一次 `POST /solve-quiz` 请求对应一个会话。会话从起始 URL 开始逐题处理，
//! 每题结束后根据服务端返回的下一题 URL 决定继续还是停止。
//!
//! ## 规则
//!
//! 1. **时间预算**：每轮开始前检查已用时间，超过 (总预算 - 安全余量) 则不再开始新的一轮
//! 2. **严格串行**：同一会话同一时间只有一轮在处理
//! 3. **失败即停**：任何一步失败都结束整个会话，不重试
//! 4. **答错也继续**：只要服务端给出下一题 URL 就继续

use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::models::{QuizTask, SessionSummary, Transition};
use crate::utils::logging::{log_round_start, log_session_complete, log_session_start};
use crate::workflow::{QuizFlow, RoundCtx};

/// 会话时间预算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBudget {
    total: Duration,
    margin: Duration,
}

impl TimeBudget {
    pub fn new(total: Duration, margin: Duration) -> Self {
        Self { total, margin }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    /// 允许开始新一轮的最晚时间点
    pub fn limit(&self) -> Duration {
        self.total.saturating_sub(self.margin)
    }

    /// 已用时间为 `elapsed` 时是否还能开始新的一轮
    pub fn allows_round(&self, elapsed: Duration) -> bool {
        elapsed <= self.limit()
    }
}

impl Default for TimeBudget {
    fn default() -> Self {
        Self::new(Duration::from_secs(180), Duration::from_secs(30))
    }
}

/// 答题会话
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub email: String,
    pub secret: String,
    pub start_url: String,
    pub started_at: Instant,
    pub budget: TimeBudget,
    /// 已开始的轮数
    pub iteration: usize,
    current_url: String,
}

impl Session {
    pub fn new(task: QuizTask, budget: TimeBudget) -> Self {
        Self {
            id: new_session_id(),
            email: task.email,
            secret: task.secret,
            start_url: task.url.clone(),
            started_at: Instant::now(),
            budget,
            iteration: 0,
            current_url: task.url,
        }
    }

    /// 指定会话开始时间
    pub fn with_start(mut self, started_at: Instant) -> Self {
        self.started_at = started_at;
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// 切换到下一题
    fn advance(&mut self, next_url: String) {
        self.current_url = next_url;
    }

    fn summary(&self) -> SessionSummary {
        SessionSummary {
            status: "processing_complete".to_string(),
            total_time: self.elapsed().as_secs_f64(),
            quizzes_attempted: self.iteration,
            final_url_attempted: self.current_url.clone(),
        }
    }
}

fn new_session_id() -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{:x}", nanos)
}

/// 答题编排器
///
/// 进程内只创建一次，所有请求共享；自身不持有任何可变状态
pub struct QuizSolver {
    flow: QuizFlow,
    budget: TimeBudget,
}

impl QuizSolver {
    pub fn new(flow: QuizFlow, budget: TimeBudget) -> Self {
        Self { flow, budget }
    }

    pub fn budget(&self) -> TimeBudget {
        self.budget
    }

    /// 为请求创建新的会话
    pub fn start_session(&self, task: QuizTask) -> Session {
        Session::new(task, self.budget)
    }

    /// 运行会话直到没有下一题、出错或时间用尽
    pub async fn solve(&self, mut session: Session) -> SessionSummary {
        log_session_start(&session.id, &session.start_url, &session.email);

        loop {
            let elapsed = session.elapsed();
            if !session.budget.allows_round(elapsed) {
                warn!(
                    "⏰ 已用 {:.1}s，超过 {}s 的开题上限，不再开始新的一轮",
                    elapsed.as_secs_f64(),
                    session.budget.limit().as_secs()
                );
                break;
            }

            session.iteration += 1;
            log_round_start(
                session.iteration,
                session.current_url(),
                elapsed.as_secs_f64(),
                session.budget.total().as_secs(),
            );

            let ctx = RoundCtx::new(
                &session.id,
                session.iteration,
                session.current_url(),
                &session.email,
                &session.secret,
            );

            let round = match self.flow.run(&ctx).await {
                Ok(round) => round,
                Err(e) => {
                    error!("{} ❌ [{}] {}，停止答题", ctx, e.stage(), e);
                    break;
                }
            };

            let correct = round.submission.as_ref().is_some_and(|s| s.correct);
            let transition = round
                .submission
                .as_ref()
                .map(Transition::from_submission)
                .unwrap_or(Transition::Stop);

            match transition {
                Transition::Continue(next_url) => {
                    if correct {
                        info!("{} ➡️  进入下一题: {}", ctx, next_url);
                    } else {
                        info!("{} ⏭️  答错，跳到下一题: {}", ctx, next_url);
                    }
                    session.advance(next_url);
                }
                Transition::Stop => {
                    info!("{} 🏁 没有下一题，结束", ctx);
                    break;
                }
            }
        }

        let summary = session.summary();
        log_session_complete(
            summary.total_time,
            summary.quizzes_attempted,
            &summary.final_url_attempted,
        );
        summary
    }
}
