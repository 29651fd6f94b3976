//! The standard per-domain cache instances.

use std::sync::Arc;

use super::bounded::BoundedCache;
use super::config::CacheConfig;
use super::maintenance::{CacheMaintenance, SweepTarget};
use super::types::{CacheDomain, CacheStats};

pub type CacheHandle<K, V> = Arc<BoundedCache<K, V>>;

/// One explicitly constructed cache per [`CacheDomain`], shared by handle.
#[derive(Debug, Clone)]
pub struct CacheDomains {
    message: CacheHandle<String, String>,
    tags: CacheHandle<String, Vec<String>>,
    vectors: CacheHandle<String, Arc<[f32]>>,
}

impl CacheDomains {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            message: Arc::new(BoundedCache::named(
                CacheDomain::Message.as_str(),
                config.message_capacity,
            )),
            tags: Arc::new(BoundedCache::named(
                CacheDomain::TagExtraction.as_str(),
                config.tag_capacity,
            )),
            vectors: Arc::new(BoundedCache::named(
                CacheDomain::Vectorization.as_str(),
                config.vector_capacity,
            )),
        }
    }

    pub fn message(&self) -> &CacheHandle<String, String> {
        &self.message
    }

    pub fn tags(&self) -> &CacheHandle<String, Vec<String>> {
        &self.tags
    }

    pub fn vectors(&self) -> &CacheHandle<String, Arc<[f32]>> {
        &self.vectors
    }

    pub fn stats(&self, domain: CacheDomain) -> CacheStats {
        match domain {
            CacheDomain::Message => self.message.stats(),
            CacheDomain::TagExtraction => self.tags.stats(),
            CacheDomain::Vectorization => self.vectors.stats(),
        }
    }

    pub fn all_stats(&self) -> Vec<(CacheDomain, CacheStats)> {
        CacheDomain::ALL
            .into_iter()
            .map(|domain| (domain, self.stats(domain)))
            .collect()
    }

    pub fn clear_all(&self) {
        self.message.clear();
        self.tags.clear();
        self.vectors.clear();
    }

    /// Builds a maintenance sweep over all three domains.
    pub fn maintenance(&self, config: &CacheConfig) -> CacheMaintenance {
        let targets = vec![
            self.message.clone() as Arc<dyn SweepTarget>,
            self.tags.clone() as Arc<dyn SweepTarget>,
            self.vectors.clone() as Arc<dyn SweepTarget>,
        ];
        CacheMaintenance::new(targets, config.min_hit_rate)
    }
}

impl Default for CacheDomains {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
