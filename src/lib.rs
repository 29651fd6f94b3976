//! Vecflow library crate: cooperative batch execution, bounded caching and hybrid rerank fusion
//! for retrieval pipelines.
//!
//! # Public API Surface
//!
//! ## Batch Execution
//! - [`BatchExecutor`], [`ExecutorConfig`] - Batched and serial processing with ordered results
//! - [`Processor`] - Typed per-item processor contract (closures implement it)
//! - [`process_with_timeout`] - Single-call timeout race
//!
//! ## Text
//! - [`split_text_into_chunks`], [`TextChunks`] - Boundary-aware chunking
//!
//! ## Caching
//! - [`BoundedCache`], [`CacheStats`] - LRU cache with hit/miss counters
//! - [`CacheDomains`], [`CacheMaintenance`] - Per-domain instances and the low-hit-rate sweep
//! - Hashing functions for canonical cache keys
//!
//! ## Rerank
//! - [`RerankFusion`], [`RerankConfig`], [`ScoredItem`] - Hybrid score fusion with fallback
//! - [`ScoringBackend`], [`HttpScoringBackend`] - Scoring endpoint transport
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod chunking;
pub mod config;
pub mod constants;
pub mod executor;
pub mod hashing;
pub mod notify;
pub mod rerank;

pub use cache::{
    BoundedCache, CacheConfig, CacheDomain, CacheDomains, CacheHandle, CacheMaintenance,
    CacheStats, MaintenanceHandle, SweepReport,
};
pub use chunking::{TextChunks, split_text_into_chunks};
pub use config::{Config, ConfigError};
pub use executor::{
    BatchExecutor, ChatMessage, ExecutorConfig, ExecutorError, ExecutorResult, ItemFailure,
    MessageEntry, MessageOptions, ProcessingResult, Processor, process_with_timeout,
};
pub use hashing::{cache_key, canonical_json, text_key};
pub use notify::{NotificationSink, NotifyLevel, NotifyOptions, TracingNotifier};
#[cfg(any(test, feature = "mock"))]
pub use notify::RecordingNotifier;
#[cfg(any(test, feature = "mock"))]
pub use rerank::MockScoringBackend;
pub use rerank::{
    HttpScoringBackend, RawScore, RerankConfig, RerankError, RerankFusion, RerankOutcome,
    RerankRequest, ScoredItem, ScoringBackend, SkipReason,
};
