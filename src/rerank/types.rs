use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::RerankError;

/// A retrieved candidate with its prior score and, once fused, its rerank and hybrid scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredItem {
    pub text: String,
    pub original_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rerank_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hybrid_score: Option<f64>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ScoredItem {
    pub fn new(text: impl Into<String>, original_score: f64) -> Self {
        Self {
            text: text.into(),
            original_score,
            rerank_score: None,
            hybrid_score: None,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn is_fused(&self) -> bool {
        self.rerank_score.is_some() || self.hybrid_score.is_some()
    }

    /// Drops any fusion fields.
    pub fn strip_fusion(mut self) -> Self {
        self.rerank_score = None;
        self.hybrid_score = None;
        self
    }
}

/// Body POSTed to the scoring endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankRequest {
    pub query: String,
    pub documents: Vec<String>,
    pub model: String,
    pub top_n: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruct: Option<String>,
}

/// One entry of the endpoint's `results` array. Every field is optional on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawScore {
    pub index: Option<usize>,
    pub relevance_score: Option<f64>,
    pub score: Option<f64>,
}

impl RawScore {
    pub fn indexed(index: usize, relevance_score: f64) -> Self {
        Self {
            index: Some(index),
            relevance_score: Some(relevance_score),
            score: None,
        }
    }

    pub fn positional(relevance_score: f64) -> Self {
        Self {
            index: None,
            relevance_score: Some(relevance_score),
            score: None,
        }
    }

    /// `relevance_score`, falling back to `score`.
    pub fn value(&self) -> Option<f64> {
        self.relevance_score.or(self.score)
    }

    /// Reads one result entry. Fields of the wrong type are treated as absent.
    pub fn from_value(entry: &Value) -> Self {
        Self {
            index: entry
                .get("index")
                .and_then(Value::as_u64)
                .and_then(|i| usize::try_from(i).ok()),
            relevance_score: entry.get("relevance_score").and_then(Value::as_f64),
            score: entry.get("score").and_then(Value::as_f64),
        }
    }

    /// Parses a response body of the form `{"results": [...]}`.
    ///
    /// A missing or non-array `results` field is a protocol error.
    pub fn parse_response(body: &Value) -> Result<Vec<Self>, RerankError> {
        let results = body
            .get("results")
            .ok_or_else(|| RerankError::protocol("missing `results` field"))?;
        let entries = results
            .as_array()
            .ok_or_else(|| RerankError::protocol("`results` is not an array"))?;
        Ok(entries.iter().map(Self::from_value).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    InvalidConfig(String),
    EmptyInput,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("rerank disabled"),
            Self::InvalidConfig(reason) => write!(f, "invalid config: {reason}"),
            Self::EmptyInput => f.write_str("no items"),
        }
    }
}

/// What happened during one `rerank` call.
#[derive(Debug)]
pub enum RerankOutcome {
    /// Items returned unchanged.
    Skipped { reason: SkipReason },
    /// Items fused and sorted by hybrid score. `unmatched` items got a rerank score of `0`.
    Fused { matched: usize, unmatched: usize },
    /// Items stripped of fusion fields and sorted by original score.
    Fallback { error: RerankError },
}

impl RerankOutcome {
    pub fn is_fused(&self) -> bool {
        matches!(self, Self::Fused { .. })
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}
