//! Cooperative batch execution over item collections.
//!
//! [`BatchExecutor`] partitions items into consecutive batches and drives each batch's processor
//! calls concurrently on the calling task. Each call owns a semaphore of `batch_size` permits, so
//! every item of a batch is launched together and separate calls never contend for slots.
//! Batches run strictly one after another with a timed pause between them and a cooperative
//! yield every `yield_after` batches. Results are written back by original index, so output order
//! always equals input order.
//!
//! There is no cancellation token: the only bound on a hung item is a timeout, either the
//! per-item timeout of [`BatchExecutor::process_serially`] or an explicit
//! [`process_with_timeout`] inside the processor.

pub mod config;
pub mod error;
pub mod messages;
pub mod processor;


pub use config::ExecutorConfig;
pub use error::{BoxError, ExecutorError, ExecutorResult, ItemFailure, ProcessingResult};
pub use messages::{ChatMessage, MessageEntry, MessageOptions, MessageText};
pub use processor::Processor;

use std::future::Future;
use std::time::Duration;

use futures_util::future::try_join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Progress callback: `(processed, total)`.
pub type OnProgress<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

/// Races `f()` against a `timeout`.
///
/// The timer lives inside the returned future and is dropped on every exit path, whether the
/// call completes, fails or times out.
pub async fn process_with_timeout<F, Fut, T, E>(f: F, timeout: Duration) -> ExecutorResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    match tokio::time::timeout(timeout, f()).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ExecutorError::Failed { source: e.into() }),
        Err(_) => Err(ExecutorError::Timeout { timeout }),
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchExecutor {
    config: ExecutorConfig,
}

impl BatchExecutor {
    /// Creates an executor, rejecting invalid configuration (e.g. `batch_size == 0`).
    pub fn new(config: ExecutorConfig) -> ExecutorResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Processes `items` in consecutive batches of `batch_size`.
    ///
    /// An item failure fails the whole call; processors that want per-item isolation must
    /// catch their own errors and return a sentinel value.
    pub async fn process_batches<I, P>(
        &self,
        items: Vec<I>,
        processor: &P,
        on_progress: Option<OnProgress<'_>>,
    ) -> ExecutorResult<Vec<P::Output>>
    where
        P: Processor<I>,
    {
        let total = items.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let mut slots: Vec<Option<P::Output>> = Vec::with_capacity(total);
        slots.resize_with(total, || None);

        let pool = Semaphore::new(self.config.batch_size);
        let mut pending = items.into_iter().enumerate().peekable();
        let mut processed = 0;
        let mut batch_no = 0;

        while pending.peek().is_some() {
            let batch: Vec<(usize, I)> = pending.by_ref().take(self.config.batch_size).collect();
            let batch_len = batch.len();

            let outputs = try_join_all(
                batch
                    .into_iter()
                    .map(|(index, item)| Self::run_item(&pool, index, item, processor)),
            )
            .await?;

            for (index, output) in outputs {
                slots[index] = Some(output);
            }

            processed += batch_len;
            batch_no += 1;
            debug!(batch = batch_no, processed, total, "Batch complete");

            if let Some(report) = on_progress {
                report(processed, total);
            }

            if processed < total {
                self.pause(batch_no).await;
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Processes `items` strictly one at a time, each bounded by `item_timeout`.
    ///
    /// Failures are reported per item and do not stop the remaining items.
    pub async fn process_serially<I, P>(
        &self,
        items: Vec<I>,
        processor: &P,
        on_progress: Option<OnProgress<'_>>,
    ) -> Vec<ProcessingResult<P::Output>>
    where
        P: Processor<I>,
    {
        let total = items.len();
        let mut results = Vec::with_capacity(total);

        for (index, item) in items.into_iter().enumerate() {
            let outcome =
                process_with_timeout(move || processor.process(item), self.config.item_timeout)
                    .await
                    .map_err(|e| e.into_item_failure(index));

            if let Err(ref failure) = outcome {
                warn!(index, error = %failure, "Serial item failed");
            }
            results.push(outcome);

            let processed = index + 1;
            if let Some(report) = on_progress {
                report(processed, total);
            }

            if processed < total {
                self.pause(processed).await;
            }
        }

        results
    }

    /// [`process_with_timeout`] with the configured `call_timeout`.
    pub async fn with_timeout<F, Fut, T, E>(&self, f: F) -> ExecutorResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        process_with_timeout(f, self.config.call_timeout).await
    }

    async fn run_item<I, P>(
        pool: &Semaphore,
        index: usize,
        item: I,
        processor: &P,
    ) -> ExecutorResult<(usize, P::Output)>
    where
        P: Processor<I>,
    {
        let _permit = pool
            .acquire()
            .await
            .map_err(|_| ExecutorError::PoolClosed)?;

        match processor.process(item).await {
            Ok(output) => Ok((index, output)),
            Err(e) => Err(ItemFailure::Processor {
                index,
                source: e.into(),
            }
            .into()),
        }
    }

    /// Suspension between units of work: a yield every `yield_after` units, then `batch_delay`.
    async fn pause(&self, completed_units: usize) {
        if self.config.yield_after > 0 && completed_units % self.config.yield_after == 0 {
            tokio::task::yield_now().await;
        }
        if !self.config.batch_delay.is_zero() {
            tokio::time::sleep(self.config.batch_delay).await;
        }
    }
}
