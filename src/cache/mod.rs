//! Bounded LRU caches, one instance per logical domain, plus a low-hit-rate maintenance sweep.
//!
//! Caches are explicitly constructed and passed around by [`CacheHandle`]; there is no global
//! cache state. Key construction is the caller's job; see [`crate::hashing::cache_key`] for a
//! canonical key builder.

pub mod bounded;
pub mod config;
pub mod domains;
pub mod maintenance;
pub mod types;

#[cfg(test)]
mod tests;

pub use bounded::BoundedCache;
pub use config::CacheConfig;
pub use domains::{CacheDomains, CacheHandle};
pub use maintenance::{
    CacheMaintenance, ClearedDomain, MaintenanceHandle, SweepReport, SweepTarget,
};
pub use types::{CacheDomain, CacheStats};
