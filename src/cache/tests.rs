use super::*;
use std::sync::Arc;
use std::time::Duration;

mod bounded_tests {
    use super::*;

    #[test]
    fn test_evicts_oldest_insert() {
        let cache = BoundedCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_promotes_entry() {
        let cache = BoundedCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.get("a"), Some(1));
        cache.set("c", 3);

        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn test_set_existing_replaces_and_refreshes() {
        let cache = BoundedCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("a", 10);
        cache.set("c", 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(10));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_keys_in_recency_order() {
        let cache = BoundedCache::new(3);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);
        cache.get("a");

        assert_eq!(cache.keys(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_miss_does_not_insert() {
        let cache: BoundedCache<String, u32> = BoundedCache::new(4);
        assert_eq!(cache.get("missing"), None);
        assert!(cache.is_empty());
        assert!(!cache.contains("missing"));
    }

    #[test]
    fn test_string_keys_borrowed_lookup() {
        let cache: BoundedCache<String, Vec<String>> = BoundedCache::named("tags", 8);
        cache.set("msg-1".to_string(), vec!["rust".to_string()]);

        assert_eq!(cache.get("msg-1"), Some(vec!["rust".to_string()]));
        assert!(cache.contains("msg-1"));
        assert_eq!(cache.name(), "tags");
    }

    #[test]
    fn test_borrowed_get_promotes_owned_key() {
        let cache: BoundedCache<String, u32> = BoundedCache::new(3);
        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);
        cache.set("c".to_string(), 3);

        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.keys(), vec!["c", "b", "a"]);

        cache.set("d".to_string(), 4);
        assert!(!cache.contains("c"));
        assert_eq!(cache.keys(), vec!["b", "a", "d"]);
        assert_eq!(cache.stats().hit_count, 3);
    }

    #[test]
    fn test_delete_removes_single_entry() {
        let cache = BoundedCache::new(3);
        cache.set("a", 1);
        cache.set("b", 2);

        assert_eq!(cache.delete("a"), Some(1));
        assert_eq!(cache.delete("a"), None);
        assert_eq!(cache.keys(), vec!["b"]);

        cache.set("c", 3);
        cache.set("d", 4);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_stats_track_hits_and_misses() {
        let cache = BoundedCache::new(10);
        cache.set("a", 1);
        cache.get("a");
        cache.get("a");
        cache.get("a");
        cache.get("zzz");

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.max_size, 10);
        assert_eq!(stats.hit_count, 3);
        assert_eq!(stats.miss_count, 1);
        assert!((stats.hit_rate - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clear_resets_entries_and_counters() {
        let cache = BoundedCache::new(10);
        cache.set("a", 1);
        cache.get("a");
        cache.get("b");

        cache.clear();
        let stats = cache.stats();
        assert_eq!(stats, CacheStats::new(0, 10, 0, 0));
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_zero_capacity_never_stores() {
        let cache = BoundedCache::new(0);
        cache.set("a", 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let json = serde_json::to_value(CacheStats::new(1, 2, 3, 1)).unwrap();
        assert_eq!(json["maxSize"], 2);
        assert_eq!(json["hitCount"], 3);
        assert_eq!(json["missCount"], 1);
        assert_eq!(json["hitRate"], 0.75);
    }

    #[test]
    fn test_concurrent_access_keeps_invariants() {
        let cache = Arc::new(BoundedCache::new(16));

        std::thread::scope(|scope| {
            for worker in 0..8u32 {
                let cache = Arc::clone(&cache);
                scope.spawn(move || {
                    for i in 0..500u32 {
                        let key = (worker * 7 + i) % 40;
                        if i % 3 == 0 {
                            cache.set(key, i);
                        } else {
                            cache.get(&key);
                        }
                    }
                });
            }
        });

        let stats = cache.stats();
        assert!(stats.size <= 16);
        assert_eq!(cache.keys().len(), stats.size);
        assert_eq!(stats.lookups(), 8 * 333);
    }
}

mod domain_tests {
    use super::*;

    #[test]
    fn test_domains_have_independent_capacity_and_counters() {
        let config = CacheConfig {
            message_capacity: 1,
            tag_capacity: 2,
            vector_capacity: 3,
            ..Default::default()
        };
        let domains = CacheDomains::new(&config);

        domains.message().set("k".to_string(), "v".to_string());
        domains.message().get("k");
        domains.tags().get("k");

        let message = domains.stats(CacheDomain::Message);
        let tags = domains.stats(CacheDomain::TagExtraction);
        let vectors = domains.stats(CacheDomain::Vectorization);

        assert_eq!((message.max_size, message.hit_count), (1, 1));
        assert_eq!((tags.max_size, tags.miss_count), (2, 1));
        assert_eq!((vectors.max_size, vectors.hit_count), (3, 0));
    }

    #[test]
    fn test_domain_handles_are_shared() {
        let domains = CacheDomains::default();
        let vectors = Arc::clone(domains.vectors());
        vectors.set("chunk".to_string(), Arc::from(vec![0.1f32, 0.2]));

        assert!(domains.vectors().contains("chunk"));
        domains.clear_all();
        assert!(vectors.is_empty());
    }

    #[test]
    fn test_all_stats_lists_every_domain() {
        let domains = CacheDomains::default();
        let names: Vec<_> = domains
            .all_stats()
            .into_iter()
            .map(|(d, _)| d.to_string())
            .collect();
        assert_eq!(names, vec!["message", "tag_extraction", "vectorization"]);
    }

    #[test]
    fn test_cache_config_validate() {
        assert!(CacheConfig::default().validate().is_ok());

        let bad_rate = CacheConfig {
            min_hit_rate: 1.5,
            ..Default::default()
        };
        assert!(bad_rate.validate().is_err());

        let bad_interval = CacheConfig {
            sweep_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(bad_interval.validate().is_err());
    }
}

mod maintenance_tests {
    use super::*;

    fn skewed_domains() -> CacheDomains {
        let domains = CacheDomains::default();

        // message: 1 hit / 4 lookups = 25%
        domains.message().set("m".to_string(), "text".to_string());
        domains.message().get("m");
        for key in ["x", "y", "z"] {
            domains.message().get(key);
        }

        // tags: 2 hits / 2 lookups = 100%
        domains.tags().set("t".to_string(), vec![]);
        domains.tags().get("t");
        domains.tags().get("t");

        // vectors: populated but never read
        domains
            .vectors()
            .set("v".to_string(), Arc::from(vec![1.0f32]));

        domains
    }

    #[test]
    fn test_sweep_clears_only_low_hit_rate_domains() {
        let domains = skewed_domains();
        let maintenance = domains.maintenance(&CacheConfig::default());

        let report = maintenance.sweep_once();

        assert_eq!(report.inspected, 3);
        assert_eq!(report.cleared.len(), 1);
        assert!(report.was_cleared("message"));
        assert!(domains.message().is_empty());
        assert_eq!(domains.stats(CacheDomain::Message).lookups(), 0);
        assert_eq!(domains.tags().len(), 1);
        assert_eq!(domains.vectors().len(), 1);
        assert_eq!(maintenance.sweeps(), 1);
    }

    #[test]
    fn test_sweep_reports_triggering_stats() {
        let domains = skewed_domains();
        let report = domains.maintenance(&CacheConfig::default()).sweep_once();

        let cleared = &report.cleared[0];
        assert_eq!(cleared.stats.hit_count, 1);
        assert_eq!(cleared.stats.miss_count, 3);
    }

    #[test]
    fn test_sweep_is_noop_for_healthy_caches() {
        let domains = CacheDomains::default();
        let report = domains.maintenance(&CacheConfig::default()).sweep_once();
        assert!(report.cleared.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_sweep_runs_on_interval() {
        let domains = skewed_domains();
        let maintenance = Arc::new(domains.maintenance(&CacheConfig::default()));
        let handle = Arc::clone(&maintenance).spawn(Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(maintenance.sweeps(), 0);
        assert_eq!(domains.message().len(), 1);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(maintenance.sweeps(), 1);
        assert!(domains.message().is_empty());

        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(maintenance.sweeps(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_sweep() {
        let maintenance = Arc::new(CacheDomains::default().maintenance(&CacheConfig::default()));
        let handle = Arc::clone(&maintenance).spawn(Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(25)).await;
        let before = maintenance.sweeps();
        assert_eq!(before, 2);

        drop(handle);
        tokio::time::sleep(Duration::from_secs(100)).await;
        assert_eq!(maintenance.sweeps(), before);
    }
}
