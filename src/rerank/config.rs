use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::RerankError;
use crate::constants::{DEFAULT_HYBRID_ALPHA, DEFAULT_RERANK_TIMEOUT_MS, DEFAULT_RERANK_TOP_N};

/// Rerank settings, injected by the host as a value object.
///
/// Field names on the wire follow the host's settings schema (`apiKey` is the only camelCase one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankConfig {
    pub enabled: bool,
    /// Scoring endpoint, POSTed to as-is.
    pub url: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
    pub model: String,
    /// Upper bound on documents scored per call and on results kept by `limit_results`.
    pub top_n: usize,
    /// Weight of the rerank score in the hybrid score, in `[0, 1]`.
    pub hybrid_alpha: f64,
    pub success_notify: bool,
    pub deduplication_enabled: bool,
    /// Forwarded verbatim as `instruct` when deduplication is enabled.
    pub deduplication_instruction: String,
    pub timeout_ms: u64,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            api_key: String::new(),
            model: String::new(),
            top_n: DEFAULT_RERANK_TOP_N,
            hybrid_alpha: DEFAULT_HYBRID_ALPHA,
            success_notify: true,
            deduplication_enabled: false,
            deduplication_instruction: String::new(),
            timeout_ms: DEFAULT_RERANK_TIMEOUT_MS,
        }
    }
}

impl RerankConfig {
    /// Enabled config pointing at `url` with the given credentials.
    pub fn endpoint(
        url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            enabled: true,
            url: url.into(),
            api_key: api_key.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.hybrid_alpha = alpha;
        self
    }

    pub fn with_success_notify(mut self, enabled: bool) -> Self {
        self.success_notify = enabled;
        self
    }

    pub fn with_deduplication(mut self, instruction: impl Into<String>) -> Self {
        self.deduplication_enabled = true;
        self.deduplication_instruction = instruction.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The `instruct` field to send, if any.
    pub fn instruction(&self) -> Option<&str> {
        let instruction = self.deduplication_instruction.trim();
        (self.deduplication_enabled && !instruction.is_empty()).then_some(instruction)
    }

    /// Checks that an enabled config can actually reach an endpoint.
    ///
    /// Does not look at `enabled`; callers decide what a disabled config means.
    pub fn validate(&self) -> Result<(), RerankError> {
        let missing = [
            ("url", &self.url),
            ("apiKey", &self.api_key),
            ("model", &self.model),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

        if let Some((field, _)) = missing {
            return Err(invalid(format!("{field} is not set")));
        }
        if !(0.0..=1.0).contains(&self.hybrid_alpha) {
            return Err(invalid(format!(
                "hybrid_alpha must be within [0, 1], got {}",
                self.hybrid_alpha
            )));
        }
        if self.top_n < 1 {
            return Err(invalid("top_n must be at least 1"));
        }
        if self.timeout_ms == 0 {
            return Err(invalid("timeout_ms must be greater than 0"));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> RerankError {
    RerankError::InvalidConfig {
        reason: reason.into(),
    }
}
