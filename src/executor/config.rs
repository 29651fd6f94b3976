use std::time::Duration;

use crate::constants::{
    DEFAULT_BATCH_DELAY_MS, DEFAULT_BATCH_SIZE, DEFAULT_CALL_TIMEOUT_MS, DEFAULT_SERIAL_ITEM_TIMEOUT_MS,
    DEFAULT_YIELD_AFTER,
};

use super::error::{ExecutorError, ExecutorResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Items launched together per batch; also the size of each call's concurrency pool. Must be > 0.
    pub batch_size: usize,
    /// Pause between consecutive batches (and between serial items).
    pub batch_delay: Duration,
    /// Batches (or serial items) between cooperative yields; `0` disables yielding.
    pub yield_after: usize,
    /// Per-item timeout for serial processing.
    pub item_timeout: Duration,
    /// Default timeout for [`BatchExecutor::with_timeout`](super::BatchExecutor::with_timeout).
    pub call_timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
            yield_after: DEFAULT_YIELD_AFTER,
            item_timeout: Duration::from_millis(DEFAULT_SERIAL_ITEM_TIMEOUT_MS),
            call_timeout: Duration::from_millis(DEFAULT_CALL_TIMEOUT_MS),
        }
    }
}

impl ExecutorConfig {
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn yield_after(mut self, batches: usize) -> Self {
        self.yield_after = batches;
        self
    }

    pub fn item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout = timeout;
        self
    }

    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn validate(&self) -> ExecutorResult<()> {
        if self.batch_size == 0 {
            return Err(ExecutorError::InvalidConfig {
                reason: "batch_size must be > 0".to_string(),
            });
        }
        if self.item_timeout.is_zero() || self.call_timeout.is_zero() {
            return Err(ExecutorError::InvalidConfig {
                reason: "timeouts must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
