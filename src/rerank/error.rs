use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while talking to the scoring endpoint.
///
/// None of these escape [`RerankFusion::rerank`](super::RerankFusion::rerank); they are logged,
/// turned into the fallback ordering and reported through
/// [`RerankOutcome::Fallback`](super::RerankOutcome::Fallback).
pub enum RerankError {
    /// Disabled or incomplete configuration.
    #[error("invalid rerank configuration: {reason}")]
    InvalidConfig {
        /// What is wrong.
        reason: String,
    },

    /// Network failure, timeout or client construction failure.
    #[error("rerank request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("rerank endpoint returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("malformed rerank response: {reason}")]
    Protocol {
        /// What is wrong with the body.
        reason: String,
    },
}

impl RerankError {
    pub(crate) fn protocol(reason: impl Into<String>) -> Self {
        Self::Protocol {
            reason: reason.into(),
        }
    }

    /// Whether this error sends `rerank` down the original-order fallback path.
    pub fn is_fallback_trigger(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::Protocol { .. }
        )
    }
}

pub type RerankResult<T> = Result<T, RerankError>;
