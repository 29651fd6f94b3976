//! Cross-cutting, shared constants.
//!
//! Durations are expressed in milliseconds (`*_MS`) or seconds (`*_SECS`) and converted to
//! [`std::time::Duration`] at the point of use.

/// Items launched together per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Timed pause between consecutive batches (throttles rate-limited backends).
pub const DEFAULT_BATCH_DELAY_MS: u64 = 100;

/// Batches processed before a cooperative yield.
pub const DEFAULT_YIELD_AFTER: usize = 5;

/// Per-item timeout used by serial processing.
pub const DEFAULT_SERIAL_ITEM_TIMEOUT_MS: u64 = 120_000;

/// Default timeout for a single guarded call.
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 30_000;

/// Messages walked between cooperative yields during message chunking.
pub const MESSAGE_YIELD_INTERVAL: usize = 50;

/// Default maximum message length (in characters) before a message is chunked.
pub const DEFAULT_MESSAGE_CHUNK_SIZE: usize = 1000;

/// Characters searched backward from a hard chunk boundary for a soft split point.
pub const CHUNK_BOUNDARY_WINDOW: usize = 100;

pub const DEFAULT_MESSAGE_CACHE_CAPACITY: usize = 1000;
pub const DEFAULT_TAG_CACHE_CAPACITY: usize = 500;
pub const DEFAULT_VECTOR_CACHE_CAPACITY: usize = 200;

/// Interval of the cache maintenance sweep.
pub const CACHE_SWEEP_INTERVAL_SECS: u64 = 5 * 60;

/// Domains whose hit rate falls below this value are cleared by the sweep.
pub const LOW_HIT_RATE_THRESHOLD: f64 = 0.30;

pub const DEFAULT_RERANK_TOP_N: usize = 20;
pub const DEFAULT_HYBRID_ALPHA: f64 = 0.7;
pub const DEFAULT_RERANK_TIMEOUT_MS: u64 = 30_000;

/// Minimum gap between two rerank success notifications.
pub const SUCCESS_NOTIFY_INTERVAL_MS: u64 = 3_000;
