use std::time::Duration;
use thiserror::Error;

/// Boxed error returned by item processors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a single work item.
#[derive(Debug, Error)]
pub enum ItemFailure {
    #[error("item {index} timed out after {timeout:?}")]
    Timeout { index: usize, timeout: Duration },

    #[error("item {index} failed: {source}")]
    Processor {
        index: usize,
        #[source]
        source: BoxError,
    },
}

impl ItemFailure {
    /// Position of the failed item in the caller's input.
    pub fn index(&self) -> usize {
        match self {
            ItemFailure::Timeout { index, .. } | ItemFailure::Processor { index, .. } => *index,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ItemFailure::Timeout { .. })
    }
}

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("invalid executor configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("operation timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("operation failed: {source}")]
    Failed {
        #[source]
        source: BoxError,
    },

    /// An item failed and took its whole batch down with it.
    #[error("batch failed: {0}")]
    Item(#[from] ItemFailure),

    #[error("concurrency pool closed")]
    PoolClosed,
}

impl ExecutorError {
    pub fn is_timeout(&self) -> bool {
        match self {
            ExecutorError::Timeout { .. } => true,
            ExecutorError::Item(failure) => failure.is_timeout(),
            _ => false,
        }
    }

    /// Attributes a call-level error to the item at `index`.
    pub fn into_item_failure(self, index: usize) -> ItemFailure {
        match self {
            ExecutorError::Timeout { timeout } => ItemFailure::Timeout { index, timeout },
            ExecutorError::Failed { source } => ItemFailure::Processor { index, source },
            ExecutorError::Item(failure) => failure,
            other => ItemFailure::Processor {
                index,
                source: Box::new(other),
            },
        }
    }
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Per-item outcome of serial processing.
pub type ProcessingResult<T> = Result<T, ItemFailure>;
