//! Transport to the external scoring endpoint.

use std::future::Future;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::config::RerankConfig;
use super::error::{RerankError, RerankResult};
use super::types::{RawScore, RerankRequest};

const MAX_ERROR_BODY_CHARS: usize = 512;

/// Something that can score documents against a query.
pub trait ScoringBackend: Send + Sync {
    /// Sends one scoring request and returns the parsed `results` entries.
    fn score(
        &self,
        request: &RerankRequest,
    ) -> impl Future<Output = RerankResult<Vec<RawScore>>> + Send;
}

/// POSTs JSON to the configured URL with bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpScoringBackend {
    client: Client,
    url: String,
    api_key: String,
}

impl HttpScoringBackend {
    pub fn new(config: &RerankConfig) -> RerankResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ScoringBackend for HttpScoringBackend {
    async fn score(&self, request: &RerankRequest) -> RerankResult<Vec<RawScore>> {
        debug!(
            url = %self.url,
            documents = request.documents.len(),
            top_n = request.top_n,
            "Sending rerank request"
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RerankError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RerankError::protocol(format!("response is not JSON: {e}")))?;
        RawScore::parse_response(&body)
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockScoringBackend;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone)]
    enum Reply {
        Body(Value),
        Status(u16),
    }

    /// In-memory backend replying with a canned body or status, recording every request.
    #[derive(Debug)]
    pub struct MockScoringBackend {
        reply: Reply,
        requests: Mutex<Vec<RerankRequest>>,
    }

    impl MockScoringBackend {
        /// Replies with `body` as if it were a 200 response.
        pub fn with_body(body: Value) -> Self {
            Self {
                reply: Reply::Body(body),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Replies with `{"results": [...]}` built from `results`.
        pub fn with_results(results: &[RawScore]) -> Self {
            let entries: Vec<Value> = results
                .iter()
                .map(|r| {
                    let mut entry = serde_json::Map::new();
                    if let Some(index) = r.index {
                        entry.insert("index".into(), index.into());
                    }
                    if let Some(score) = r.relevance_score {
                        entry.insert("relevance_score".into(), score.into());
                    }
                    if let Some(score) = r.score {
                        entry.insert("score".into(), score.into());
                    }
                    Value::Object(entry)
                })
                .collect();
            Self::with_body(serde_json::json!({ "results": entries }))
        }

        /// Fails every call with the given HTTP status.
        pub fn with_status(status: u16) -> Self {
            Self {
                reply: Reply::Status(status),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<RerankRequest> {
            self.requests.lock().clone()
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().len()
        }
    }

    impl ScoringBackend for MockScoringBackend {
        async fn score(&self, request: &RerankRequest) -> RerankResult<Vec<RawScore>> {
            self.requests.lock().push(request.clone());
            match &self.reply {
                Reply::Body(body) => RawScore::parse_response(body),
                Reply::Status(status) => Err(RerankError::Status {
                    status: *status,
                    body: String::new(),
                }),
            }
        }
    }
}
