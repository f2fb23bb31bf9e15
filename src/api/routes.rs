//! HTTP 接口
//!
//! - `POST /solve-quiz` 校验凭证后运行答题会话，会话结束才返回
//! - `GET /health` 健康检查
//! - `GET /` 服务说明

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{QuizTask, SessionSummary};
use crate::orchestrator::QuizSolver;

/// 所有请求共享的状态
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub solver: Arc<QuizSolver>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Auth => (
                StatusCode::FORBIDDEN,
                "Invalid email or secret provided.".to_string(),
            ),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/solve-quiz", post(solve_quiz))
        .with_state(state)
}

pub async fn solve_quiz(
    State(state): State<AppState>,
    Json(task): Json<QuizTask>,
) -> Result<Json<SessionSummary>, AppError> {
    if !state.config.credentials_match(&task.email, &task.secret) {
        warn!("🚫 凭证不匹配，拒绝请求 (email: {})", task.email);
        return Err(AppError::Auth);
    }

    // 会话在独立任务中运行，调用方断开连接也不会中断正在进行的调用
    let solver = state.solver.clone();
    let session = solver.start_session(task);
    let summary = tokio::spawn(async move { solver.solve(session).await })
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;

    Ok(Json(summary))
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "email": state.config.student_email,
        "secret_configured": !state.config.student_secret.is_empty(),
        "openai_key_configured": !state.config.llm_api_key.is_empty(),
    }))
}

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "LLM Quiz Solver API",
        "endpoints": {
            "health": "/health",
            "solve": "/solve-quiz (POST)",
        }
    }))
}
