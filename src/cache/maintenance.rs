//! Periodic low-hit-rate sweep over cache domains.
//!
//! A domain whose hit rate drops below the configured floor is cleared: when caching is not
//! paying off, freshness wins over memory. The sweep only inspects and clears; it never fails.

use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use super::bounded::BoundedCache;
use super::types::CacheStats;

/// Object-safe view of a cache for the maintenance sweep.
pub trait SweepTarget: Send + Sync {
    fn name(&self) -> &str;
    fn stats(&self) -> CacheStats;
    fn clear(&self);
}

impl<K, V> SweepTarget for BoundedCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn name(&self) -> &str {
        BoundedCache::name(self)
    }

    fn stats(&self) -> CacheStats {
        BoundedCache::stats(self)
    }

    fn clear(&self) {
        BoundedCache::clear(self)
    }
}

/// A domain cleared by a sweep, with the stats that triggered it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearedDomain {
    pub name: String,
    pub stats: CacheStats,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub inspected: usize,
    pub cleared: Vec<ClearedDomain>,
}

impl SweepReport {
    pub fn was_cleared(&self, name: &str) -> bool {
        self.cleared.iter().any(|c| c.name == name)
    }
}

pub struct CacheMaintenance {
    targets: Vec<Arc<dyn SweepTarget>>,
    min_hit_rate: f64,
    sweeps: AtomicU64,
}

impl CacheMaintenance {
    pub fn new(targets: Vec<Arc<dyn SweepTarget>>, min_hit_rate: f64) -> Self {
        Self {
            targets,
            min_hit_rate,
            sweeps: AtomicU64::new(0),
        }
    }

    /// Number of completed sweeps.
    pub fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }

    /// Inspects every target once and clears the ineffective ones.
    ///
    /// Domains without any lookup since their last clear are left alone.
    pub fn sweep_once(&self) -> SweepReport {
        let mut report = SweepReport {
            inspected: self.targets.len(),
            cleared: Vec::new(),
        };

        for target in &self.targets {
            let stats = target.stats();
            if stats.lookups() == 0 || stats.hit_rate >= self.min_hit_rate {
                continue;
            }

            info!(
                cache = target.name(),
                hit_rate = stats.hit_rate,
                size = stats.size,
                lookups = stats.lookups(),
                floor = self.min_hit_rate,
                "Clearing cache with low hit rate"
            );
            target.clear();
            report.cleared.push(ClearedDomain {
                name: target.name().to_string(),
                stats,
            });
        }

        self.sweeps.fetch_add(1, Ordering::Relaxed);
        debug!(
            inspected = report.inspected,
            cleared = report.cleared.len(),
            "Cache sweep complete"
        );
        report
    }

    /// Runs [`sweep_once`](Self::sweep_once) every `period` until the handle is shut down or dropped.
    ///
    /// The first sweep happens one full `period` after spawning.
    pub fn spawn(self: Arc<Self>, period: Duration) -> MaintenanceHandle {
        let period = period.max(Duration::from_millis(1));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let join = tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        self.sweep_once();
                    }
                }
            }
            debug!("Cache maintenance stopped");
        });

        MaintenanceHandle {
            shutdown_tx: Some(shutdown_tx),
            join: Some(join),
        }
    }
}

impl std::fmt::Debug for CacheMaintenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheMaintenance")
            .field(
                "targets",
                &self.targets.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .field("min_hit_rate", &self.min_hit_rate)
            .field("sweeps", &self.sweeps())
            .finish()
    }
}

/// Cancellation handle for a spawned maintenance ticker.
///
/// Dropping the handle also stops the ticker.
pub struct MaintenanceHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl MaintenanceHandle {
    /// Stops the ticker and waits for the task to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(|j| j.is_finished())
    }
}

impl Drop for MaintenanceHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
