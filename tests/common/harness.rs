//! Local scoring endpoint for HTTP backend tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use vecflow::rerank::RerankRequest;

pub const RERANK_PATH: &str = "/v1/rerank";

/// How the scoring endpoint answers.
#[derive(Debug, Clone)]
pub enum ScorerBehavior {
    /// One relevance score per document. Results come back sorted by score, indexed, cut to `top_n`.
    Scores(Vec<f64>),
    /// Bare HTTP status with a short text body.
    Status(u16),
    /// 200 with this JSON body.
    Body(Value),
    /// 200 with a body that is not JSON.
    Garbage,
    /// Sleeps before answering with empty results.
    Delay(Duration),
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: RerankRequest,
}

#[derive(Clone)]
struct ScorerState {
    behavior: ScorerBehavior,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

pub struct TestScorer {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestScorer {
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, RERANK_PATH)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().clone()
    }
}

impl Drop for TestScorer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn spawn_scorer(behavior: ScorerBehavior) -> std::io::Result<TestScorer> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = ScorerState {
        behavior,
        captured: Arc::clone(&captured),
    };
    let app = Router::new()
        .route(RERANK_PATH, post(score))
        .with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    Ok(TestScorer {
        addr,
        captured,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}

async fn score(
    State(state): State<ScorerState>,
    headers: HeaderMap,
    Json(body): Json<RerankRequest>,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.captured.lock().push(CapturedRequest {
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: body.clone(),
    });

    match state.behavior {
        ScorerBehavior::Scores(scores) => {
            let mut results: Vec<(usize, f64)> = scores.into_iter().enumerate().collect();
            results.sort_by(|a, b| b.1.total_cmp(&a.1));
            results.truncate(body.top_n);
            let results: Vec<Value> = results
                .into_iter()
                .map(|(index, score)| json!({ "index": index, "relevance_score": score }))
                .collect();
            Json(json!({ "results": results })).into_response()
        }
        ScorerBehavior::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap();
            (status, "scorer unavailable").into_response()
        }
        ScorerBehavior::Body(value) => Json(value).into_response(),
        ScorerBehavior::Garbage => (StatusCode::OK, "<html>oops</html>").into_response(),
        ScorerBehavior::Delay(delay) => {
            tokio::time::sleep(delay).await;
            Json(json!({ "results": [] })).into_response()
        }
    }
}
