//! Hybrid rerank fusion.
//!
//! [`RerankFusion`] sends candidate texts to an external scoring endpoint, blends the returned
//! relevance scores with each candidate's prior score and sorts by the blend:
//!
//! ```text
//! hybrid = relevance * alpha + original * (1 - alpha)
//! ```
//!
//! `rerank` never fails. A disabled or incomplete config, or an empty list, returns the input
//! untouched. Any transport or protocol failure returns the input sorted by original score with
//! no fusion fields, and emits one warning notification.

pub mod backend;
pub mod config;
pub mod error;
pub mod fusion;
pub mod types;


pub use backend::{HttpScoringBackend, ScoringBackend};
#[cfg(any(test, feature = "mock"))]
pub use backend::MockScoringBackend;
pub use config::RerankConfig;
pub use error::{RerankError, RerankResult};
pub use fusion::{hybrid_score, reconcile_scores};
pub use types::{RawScore, RerankOutcome, RerankRequest, ScoredItem, SkipReason};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::constants::SUCCESS_NOTIFY_INTERVAL_MS;
use crate::notify::{NotificationSink, NotifyLevel, NotifyOptions, NotifyThrottle, TracingNotifier};

const NOTIFY_TITLE: &str = "Rerank";

pub struct RerankFusion<B = HttpScoringBackend> {
    config: RerankConfig,
    backend: B,
    notifier: Arc<dyn NotificationSink>,
    success_throttle: NotifyThrottle,
    query_notification_active: AtomicBool,
}

impl RerankFusion<HttpScoringBackend> {
    /// Builds a fusion stage backed by HTTP.
    ///
    /// Only fails if the HTTP client cannot be built; an invalid config is accepted and turns
    /// every `rerank` call into a pass-through.
    pub fn new(config: RerankConfig) -> RerankResult<Self> {
        let backend = HttpScoringBackend::new(&config)?;
        Ok(Self::with_backend(config, backend))
    }
}

impl<B: ScoringBackend> RerankFusion<B> {
    pub fn with_backend(config: RerankConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            notifier: Arc::new(TracingNotifier),
            success_throttle: NotifyThrottle::new(Duration::from_millis(
                SUCCESS_NOTIFY_INTERVAL_MS,
            )),
            query_notification_active: AtomicBool::new(false),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &RerankConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Marks the host's query notification as showing; success notices are suppressed meanwhile.
    pub fn set_query_notification_active(&self, active: bool) {
        self.query_notification_active.store(active, Ordering::Relaxed);
    }

    pub fn is_query_notification_active(&self) -> bool {
        self.query_notification_active.load(Ordering::Relaxed)
    }

    /// Reranks `items` against `query`. See [`rerank_detailed`](Self::rerank_detailed).
    pub async fn rerank(&self, query: &str, items: Vec<ScoredItem>) -> Vec<ScoredItem> {
        self.rerank_detailed(query, items).await.0
    }

    /// Reranks `items` against `query`, also reporting which path was taken.
    pub async fn rerank_detailed(
        &self,
        query: &str,
        items: Vec<ScoredItem>,
    ) -> (Vec<ScoredItem>, RerankOutcome) {
        if let Some(reason) = self.skip_reason(&items) {
            debug!(%reason, items = items.len(), "Rerank skipped");
            return (items, RerankOutcome::Skipped { reason });
        }

        let request = self.build_request(query, &items);
        match self.backend.score(&request).await {
            Ok(results) => {
                let scores = reconcile_scores(&results, items.len());
                let matched = scores.iter().filter(|s| s.is_some()).count();
                let unmatched = items.len() - matched;
                if unmatched > 0 {
                    warn!(
                        matched,
                        unmatched,
                        results = results.len(),
                        "Rerank results did not cover every item; unmatched items scored 0"
                    );
                }

                let fused = fusion::fuse(items, &scores, self.config.hybrid_alpha);
                info!(
                    items = fused.len(),
                    matched,
                    alpha = self.config.hybrid_alpha,
                    "Rerank fused"
                );
                self.notify_success(fused.len());
                (fused, RerankOutcome::Fused { matched, unmatched })
            }
            Err(error) => {
                warn!(error = %error, items = items.len(), "Rerank failed; using original order");
                self.notifier.notify(
                    "Rerank service unavailable, results are shown in their original order",
                    NOTIFY_TITLE,
                    &NotifyOptions::new(NotifyLevel::Warning),
                );
                (fusion::original_order(items), RerankOutcome::Fallback { error })
            }
        }
    }

    /// The first `min(top_n, max_from_caller)` entries of `list`, order untouched.
    pub fn limit_results<T>(&self, mut list: Vec<T>, max_from_caller: usize) -> Vec<T> {
        list.truncate(self.config.top_n.min(max_from_caller));
        list
    }

    fn skip_reason(&self, items: &[ScoredItem]) -> Option<SkipReason> {
        if !self.config.enabled {
            return Some(SkipReason::Disabled);
        }
        if let Err(e) = self.config.validate() {
            let reason = match e {
                RerankError::InvalidConfig { reason } => reason,
                other => other.to_string(),
            };
            return Some(SkipReason::InvalidConfig(reason));
        }
        items.is_empty().then_some(SkipReason::EmptyInput)
    }

    fn build_request(&self, query: &str, items: &[ScoredItem]) -> RerankRequest {
        RerankRequest {
            query: query.to_string(),
            documents: items.iter().map(|item| item.text.clone()).collect(),
            model: self.config.model.clone(),
            top_n: items.len().min(self.config.top_n),
            instruct: self.config.instruction().map(str::to_string),
        }
    }

    fn notify_success(&self, count: usize) {
        if !self.config.success_notify || self.is_query_notification_active() {
            return;
        }
        if self.success_throttle.try_acquire() {
            self.notifier.notify(
                &format!("Reranked {count} results"),
                NOTIFY_TITLE,
                &NotifyOptions::new(NotifyLevel::Success),
            );
        }
    }
}

impl<B> std::fmt::Debug for RerankFusion<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RerankFusion")
            .field("enabled", &self.config.enabled)
            .field("url", &self.config.url)
            .field("model", &self.config.model)
            .field("top_n", &self.config.top_n)
            .field("hybrid_alpha", &self.config.hybrid_alpha)
            .finish_non_exhaustive()
    }
}
