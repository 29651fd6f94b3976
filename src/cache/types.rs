use serde::Serialize;

/// Snapshot of one cache's occupancy and effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    /// `hit_count / (hit_count + miss_count)`, or `0.0` before any lookup.
    pub hit_rate: f64,
}

impl CacheStats {
    pub fn new(size: usize, max_size: usize, hit_count: u64, miss_count: u64) -> Self {
        let lookups = hit_count + miss_count;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            hit_count as f64 / lookups as f64
        };
        Self {
            size,
            max_size,
            hit_count,
            miss_count,
            hit_rate,
        }
    }

    #[inline]
    pub fn lookups(&self) -> u64 {
        self.hit_count + self.miss_count
    }
}

/// Logical cache domains with independent capacity and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheDomain {
    /// Per-message results (e.g. cleaned message text).
    Message,
    /// Tag-extraction results.
    TagExtraction,
    /// Vectorization results.
    Vectorization,
}

impl CacheDomain {
    pub const ALL: [CacheDomain; 3] = [
        CacheDomain::Message,
        CacheDomain::TagExtraction,
        CacheDomain::Vectorization,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheDomain::Message => "message",
            CacheDomain::TagExtraction => "tag_extraction",
            CacheDomain::Vectorization => "vectorization",
        }
    }
}

impl std::fmt::Display for CacheDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
