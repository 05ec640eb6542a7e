//! Mock P-Box device
//!
//! Serves `POST /api/aoip/volume-tx`, checks the bearer token, enforces the
//! device's ±40 dB range and records every request it sees.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// A request as the device received it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

impl RecordedRequest {
    /// dB value of each TX channel in the request body
    pub fn levels(&self) -> Vec<i64> {
        self.body["volumes"]
            .as_array()
            .map(|v| v.iter().filter_map(|c| c["db"].as_i64()).collect())
            .unwrap_or_default()
    }
}

struct MockPboxState {
    token: String,
    /// Raw body to send instead of the simulated answer
    reply_override: Option<String>,
    requests: Vec<RecordedRequest>,
    /// Last accepted level per TX channel
    tx_levels: [i64; 2],
}

pub struct MockPbox {
    addr: SocketAddr,
    state: Arc<RwLock<MockPboxState>>,
    handle: JoinHandle<()>,
}

impl MockPbox {
    /// Start a mock device on a random port accepting `token`
    pub async fn start(token: &str) -> Self {
        let state = Arc::new(RwLock::new(MockPboxState {
            token: token.to_string(),
            reply_override: None,
            requests: Vec::new(),
            tx_levels: [0, 0],
        }));

        let app = Router::new()
            .route("/api/aoip/volume-tx", post(handle_volume_tx))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Address in the form the plugin settings store it (`host:port`)
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Answer every request with `body` verbatim
    pub async fn reply_with(&self, body: &str) {
        self.state.write().await.reply_override = Some(body.to_string());
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.read().await.requests.clone()
    }

    pub async fn tx_levels(&self) -> [i64; 2] {
        self.state.read().await.tx_levels
    }

    pub async fn stop(self) {
        self.handle.abort();
    }
}

async fn handle_volume_tx(
    State(state): State<Arc<RwLock<MockPboxState>>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

    let mut state = state.write().await;
    let request = RecordedRequest {
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: parsed.clone(),
    };
    state.requests.push(request.clone());

    if let Some(reply) = &state.reply_override {
        return (StatusCode::OK, reply.clone());
    }

    if request.authorization != Some(format!("Bearer {}", state.token)) {
        return (
            StatusCode::UNAUTHORIZED,
            json!({"status": 1, "code": "Unauthorized"}).to_string(),
        );
    }

    let levels = request.levels();
    if levels.len() != 2 {
        return (
            StatusCode::BAD_REQUEST,
            json!({"status": 2, "code": "BadRequest"}).to_string(),
        );
    }
    if levels.iter().any(|db| !(-40..=40).contains(db)) {
        return (
            StatusCode::OK,
            json!({"status": 27, "code": "OutOfRange"}).to_string(),
        );
    }

    state.tx_levels = [levels[0], levels[1]];
    (StatusCode::OK, json!({"status": 0}).to_string())
}
