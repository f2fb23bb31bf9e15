use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use quiz_solver::clients::{SubmitClient, Submitter};
use quiz_solver::models::{coerce_answer, SubmissionPayload};

type Received = Arc<Mutex<Vec<Value>>>;

/// 本地的"题目服务端"，记录收到的请求体
async fn spawn_quiz_host() -> (SocketAddr, Received, oneshot::Sender<()>, JoinHandle<()>) {
    async fn correct(State(received): State<Received>, Json(body): Json<Value>) -> Json<Value> {
        received.lock().unwrap().push(body);
        Json(json!({ "correct": true, "url": null }))
    }

    async fn wrong(
        State(received): State<Received>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        received.lock().unwrap().push(body);
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "correct": false,
                "url": "https://quiz.test/q2",
                "reason": "Expected 42"
            })),
        )
    }

    async fn garbage() -> &'static str {
        "<html>502 Bad Gateway</html>"
    }

    async fn slow() -> Json<Value> {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Json(json!({ "correct": true }))
    }

    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/correct", post(correct))
        .route("/wrong", post(wrong))
        .route("/garbage", post(garbage))
        .route("/slow", post(slow))
        .with_state(received.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("local_addr should succeed");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    (addr, received, shutdown_tx, handle)
}

fn payload(raw_answer: &str) -> SubmissionPayload {
    SubmissionPayload {
        email: "student@example.com".to_string(),
        secret: "s3cret".to_string(),
        url: "https://quiz.test/q1".to_string(),
        answer: coerce_answer(raw_answer),
    }
}

#[tokio::test]
async fn test_submit_sends_typed_answer() {
    let (addr, received, shutdown_tx, handle) = spawn_quiz_host().await;
    let client = SubmitClient::new(Duration::from_secs(5)).expect("创建客户端失败");

    let result = client
        .submit(&format!("http://{}/correct", addr), &payload("42"))
        .await
        .expect("提交应该成功");

    assert!(result.correct);
    assert_eq!(result.next_url(), None);

    let bodies = received.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({
            "email": "student@example.com",
            "secret": "s3cret",
            "url": "https://quiz.test/q1",
            "answer": 42
        })
    );

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn test_non_success_status_with_json_body_is_parsed() {
    let (addr, received, shutdown_tx, handle) = spawn_quiz_host().await;
    let client = SubmitClient::new(Duration::from_secs(5)).expect("创建客户端失败");

    let result = client
        .submit(&format!("http://{}/wrong", addr), &payload("'forty two'"))
        .await
        .expect("JSON 响应体应该被解析");

    assert!(!result.correct);
    assert_eq!(result.next_url(), Some("https://quiz.test/q2"));
    assert_eq!(result.reason.as_deref(), Some("Expected 42"));
    assert_eq!(received.lock().unwrap()[0]["answer"], "forty two");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn test_non_json_response_is_error() {
    let (addr, _received, shutdown_tx, handle) = spawn_quiz_host().await;
    let client = SubmitClient::new(Duration::from_secs(5)).expect("创建客户端失败");

    let result = client
        .submit(&format!("http://{}/garbage", addr), &payload("1"))
        .await;

    assert!(result.is_err());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn test_submit_timeout_is_error() {
    let (addr, _received, shutdown_tx, handle) = spawn_quiz_host().await;
    let client = SubmitClient::new(Duration::from_millis(200)).expect("创建客户端失败");

    let result = client
        .submit(&format!("http://{}/slow", addr), &payload("1"))
        .await;

    let err = result.expect_err("应该超时");
    assert!(err.to_string().contains("超时"), "unexpected error: {:#}", err);

    let _ = shutdown_tx.send(());
    handle.abort();
}
