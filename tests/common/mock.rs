//! Mock Flowdock service.
//!
//! Serves a streaming endpoint guarded by basic auth and the two messages
//! endpoints, recording every post it receives.

#![allow(dead_code)]

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use flowbot::Config;
use futures_util::stream::{self, StreamExt};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub const USERNAME: &str = "bot@acme.test";
pub const PASSWORD: &str = "s3cret";
pub const FLOW_TOKEN: &str = "flow-token-123";

/// One request received on a messages endpoint.
#[derive(Debug, Clone)]
pub struct RecordedPost {
    /// `chat` or `inbox`.
    pub kind: &'static str,
    pub token: String,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

struct MockState {
    lines: Vec<String>,
    hold_open: bool,
    post_status: StatusCode,
    posts: Mutex<Vec<RecordedPost>>,
}

/// A running mock service on an ephemeral port.
pub struct MockFlowdock {
    addr: SocketAddr,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

/// Builder for [`MockFlowdock`].
#[derive(Default)]
pub struct MockBuilder {
    lines: Vec<String>,
    hold_open: bool,
    post_status: Option<StatusCode>,
}

impl MockBuilder {
    /// Add one stream line (the newline is appended).
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Keep the stream open after the last line instead of closing it.
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Status returned by the messages endpoints (default 200).
    pub fn post_status(mut self, status: StatusCode) -> Self {
        self.post_status = Some(status);
        self
    }

    pub async fn spawn(self) -> MockFlowdock {
        let state = Arc::new(MockState {
            lines: self.lines,
            hold_open: self.hold_open,
            post_status: self.post_status.unwrap_or(StatusCode::OK),
            posts: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/flows/acme/main", get(stream_handler))
            .route("/flows/acme/stalled", get(stalled_handler))
            .route("/messages/chat/:token", post(chat_handler))
            .route("/messages/team_inbox/:token", post(inbox_handler))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock local addr");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        MockFlowdock {
            addr,
            state,
            handle,
        }
    }
}

impl MockFlowdock {
    pub fn builder() -> MockBuilder {
        MockBuilder::default()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Configuration pointing every endpoint at this mock.
    pub fn config(&self) -> Config {
        let mut config = Config::new(
            self.url("/flows/acme/main"),
            FLOW_TOKEN,
            USERNAME,
            PASSWORD,
        );
        config.flowdock.chat_url = self.url("/messages/chat/");
        config.flowdock.inbox_url = self.url("/messages/team_inbox");
        config
    }

    pub fn posts(&self) -> Vec<RecordedPost> {
        self.state.posts.lock().clone()
    }
}

impl Drop for MockFlowdock {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Basic {}", STANDARD.encode(format!("{USERNAME}:{PASSWORD}")));
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected)
}

async fn stream_handler(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "bad credentials").into_response();
    }

    let chunks: Vec<Result<Bytes, std::io::Error>> = state
        .lines
        .iter()
        .map(|line| Ok(Bytes::from(format!("{line}\n"))))
        .collect();
    let body = stream::iter(chunks);

    if state.hold_open {
        Body::from_stream(body.chain(stream::pending())).into_response()
    } else {
        Body::from_stream(body).into_response()
    }
}

/// Accepts the request but never sends response headers.
async fn stalled_handler() -> Response {
    std::future::pending::<()>().await;
    StatusCode::OK.into_response()
}

fn record(
    state: &MockState,
    kind: &'static str,
    token: String,
    headers: &HeaderMap,
    body: serde_json::Value,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.posts.lock().push(RecordedPost {
        kind,
        token,
        content_type,
        body,
    });

    if state.post_status.is_success() {
        (state.post_status, "{}").into_response()
    } else {
        (state.post_status, "mock failure").into_response()
    }
}

async fn chat_handler(
    State(state): State<Arc<MockState>>,
    Path(token): Path<String>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    record(&state, "chat", token, &headers, body)
}

async fn inbox_handler(
    State(state): State<Arc<MockState>>,
    Path(token): Path<String>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    record(&state, "inbox", token, &headers, body)
}
