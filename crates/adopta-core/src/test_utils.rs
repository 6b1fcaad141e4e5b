//! Test utilities for adopta-core
//!
//! Provides a mock chat-completions server so delegation can be tested
//! end-to-end without a real model provider.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// How long a hanging mock holds each request
const HANG_FOR: Duration = Duration::from_secs(60);

/// How the mock server answers `/chat/completions`
#[derive(Debug, Clone)]
enum Mode {
    Ok(String),
    Status(u16),
    Malformed,
    EmptyChoices,
    /// Accepts the request and never answers in time
    Hang,
}

/// One request received by the mock server
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    mode: Mode,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Mock chat-completions server for tests
pub struct MockChatServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockChatServer {
    /// Answers every request with `reply`
    pub async fn ok(reply: &str) -> Self {
        Self::start(Mode::Ok(reply.to_string())).await
    }

    /// Answers every request with the given HTTP status
    pub async fn status(code: u16) -> Self {
        Self::start(Mode::Status(code)).await
    }

    /// Answers with a 200 whose body is not a chat completion
    pub async fn malformed() -> Self {
        Self::start(Mode::Malformed).await
    }

    /// Answers with a well-formed completion that has no choices
    pub async fn empty_choices() -> Self {
        Self::start(Mode::EmptyChoices).await
    }

    /// Holds every request open far longer than any test timeout
    pub async fn hanging() -> Self {
        Self::start(Mode::Hang).await
    }

    async fn start(mode: Mode) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            mode,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/chat/completions", post(handle_chat_completions))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for this mock server (use as the api_url)
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockChatServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_chat_completions(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state.requests.lock().unwrap().push(CapturedRequest {
        authorization,
        body,
    });

    match state.mode {
        Mode::Ok(reply) => Json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": reply },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30 }
        }))
        .into_response(),
        Mode::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({ "error": { "message": "mock failure" } }))).into_response()
        }
        Mode::Malformed => (StatusCode::OK, "<html>not json</html>").into_response(),
        Mode::EmptyChoices => Json(json!({ "choices": [] })).into_response(),
        Mode::Hang => {
            tokio::time::sleep(HANG_FOR).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
    }
}
