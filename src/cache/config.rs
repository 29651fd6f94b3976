use std::time::Duration;

use crate::constants::{
    CACHE_SWEEP_INTERVAL_SECS, DEFAULT_MESSAGE_CACHE_CAPACITY, DEFAULT_TAG_CACHE_CAPACITY,
    DEFAULT_VECTOR_CACHE_CAPACITY, LOW_HIT_RATE_THRESHOLD,
};

use super::types::CacheDomain;

/// Capacities of the standard cache domains and the maintenance sweep policy.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub message_capacity: usize,
    pub tag_capacity: usize,
    pub vector_capacity: usize,
    pub sweep_interval: Duration,
    /// Domains below this hit rate are cleared by the sweep.
    pub min_hit_rate: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            message_capacity: DEFAULT_MESSAGE_CACHE_CAPACITY,
            tag_capacity: DEFAULT_TAG_CACHE_CAPACITY,
            vector_capacity: DEFAULT_VECTOR_CACHE_CAPACITY,
            sweep_interval: Duration::from_secs(CACHE_SWEEP_INTERVAL_SECS),
            min_hit_rate: LOW_HIT_RATE_THRESHOLD,
        }
    }
}

impl CacheConfig {
    pub fn capacity(&self, domain: CacheDomain) -> usize {
        match domain {
            CacheDomain::Message => self.message_capacity,
            CacheDomain::TagExtraction => self.tag_capacity,
            CacheDomain::Vectorization => self.vector_capacity,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sweep_interval.is_zero() {
            return Err("sweep_interval must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_hit_rate) {
            return Err(format!(
                "min_hit_rate must be between 0.0 and 1.0, got {}",
                self.min_hit_rate
            ));
        }
        Ok(())
    }
}
