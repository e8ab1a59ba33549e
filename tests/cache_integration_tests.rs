//! Integration Tests for the Cache API
//!
//! Exercises the public handle end to end on the real clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::sleep;
use std::time::Duration;

use ttl_lru::{run_workload, CacheError, Config, ManualClock, TtlCache};

// == Helper Functions ==

fn recording_cache<K>(capacity: usize, ttl: Duration) -> (TtlCache<K, i32>, Arc<Mutex<Vec<i32>>>)
where
    K: std::hash::Hash + Eq + Clone,
{
    let evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&evicted);
    let cache = TtlCache::new(capacity, ttl, move |value: i32| {
        sink.lock().unwrap().push(value)
    });
    (cache, evicted)
}

fn evicted_values(evicted: &Arc<Mutex<Vec<i32>>>) -> Vec<i32> {
    evicted.lock().unwrap().clone()
}

// == Scenario Tests ==

#[test]
fn test_end_to_end_scenario() {
    let (cache, evicted) = recording_cache(2, Duration::from_secs(3600));

    cache.put("A", 1);
    sleep(Duration::from_millis(5));
    cache.put("B", 2);
    assert_eq!(cache.len(), 2);

    // A is the oldest
    sleep(Duration::from_millis(5));
    cache.put("C", 3);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&"A"), None);

    // Refresh B: C becomes the oldest
    sleep(Duration::from_millis(5));
    assert_eq!(cache.get(&"B"), Some(2));

    sleep(Duration::from_millis(5));
    cache.put("D", 4);
    assert_eq!(cache.get(&"C"), None);
    assert!(cache.contains(&"B"));
    assert!(cache.contains(&"D"));
    assert_eq!(evicted_values(&evicted), vec![1, 3]);
}

#[test]
fn test_ttl_expiry_precedence() {
    let (cache, evicted) = recording_cache(2, Duration::from_millis(1));

    cache.put("A", 1);
    sleep(Duration::from_millis(5));
    cache.put("B", 2);
    cache.put("C", 3);

    assert_eq!(evicted_values(&evicted), vec![1]);
    assert!(cache.contains(&"B"));
    assert!(cache.contains(&"C"));
    assert!(!cache.contains(&"A"));
}

#[test]
fn test_callback_exactly_once() {
    let (cache, evicted) = recording_cache(1, Duration::from_secs(3600));

    cache.put("a", 1);
    cache.put("b", 2);
    assert_eq!(evicted_values(&evicted), vec![1]);

    cache.remove(&"b");
    cache.remove(&"b");
    assert_eq!(evicted_values(&evicted), vec![1, 2]);
    assert!(cache.is_empty());
}

#[test]
fn test_absent_get_has_no_side_effect() {
    let (cache, evicted) = recording_cache(2, Duration::from_secs(3600));
    cache.put("present", 1);

    assert_eq!(cache.get(&"never-inserted"), None);

    assert_eq!(cache.len(), 1);
    assert!(evicted_values(&evicted).is_empty());
}

#[test]
fn test_stale_entries_linger_without_pressure() {
    let (cache, evicted) = recording_cache(10, Duration::from_millis(1));

    cache.put("a", 1);
    cache.put("b", 2);
    sleep(Duration::from_millis(5));

    // Nothing sweeps in the background
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.expires_in(&"a"), Some(Duration::ZERO));

    assert_eq!(cache.purge_expired(), 2);
    assert!(cache.is_empty());
    let mut values = evicted_values(&evicted);
    values.sort_unstable();
    assert_eq!(values, vec![1, 2]);
}

#[test]
fn test_manual_clock_drives_expiry() {
    let clock = ManualClock::new();
    let cache = TtlCache::new(4, Duration::from_secs(10), |_: i32| {}).with_clock(clock.clone());

    cache.put("a", 1);
    clock.advance(Duration::from_secs(4));
    assert_eq!(cache.expires_in(&"a"), Some(Duration::from_secs(6)));

    clock.advance(Duration::from_secs(6));
    assert_eq!(cache.purge_expired(), 1);
    assert!(cache.is_empty());
}

#[test]
fn test_zero_capacity_is_rejected() {
    let result = TtlCache::<String, i32>::try_new(0, Duration::from_secs(1), |_| {});
    assert_eq!(result.err(), Some(CacheError::ZeroCapacity));

    let config = Config {
        capacity: 0,
        ..Config::default()
    };
    assert!(TtlCache::<String, i32>::from_config(&config, |_| {}).is_err());
}

// == Concurrency Tests ==

#[test]
fn test_shared_across_threads() {
    const THREADS: u64 = 6;
    const PER_THREAD: u64 = 1000;

    let callbacks = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&callbacks);
    let cache = Arc::new(TtlCache::new(32, Duration::from_secs(3600), move |_: u64| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let key = format!("{t}-{i}");
                    cache.put(key.clone(), i);
                    if i % 3 == 0 {
                        cache.remove(key.as_str());
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 32);
    assert_eq!(
        callbacks.load(Ordering::SeqCst) + cache.len() as u64,
        THREADS * PER_THREAD
    );
    assert_eq!(cache.stats().callback_invocations(), callbacks.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_workload_driver() {
    let config = Config {
        capacity: 50,
        ttl_ms: 60_000,
        workers: 3,
        operations: 3000,
        key_space: 200,
    };
    let cache = Arc::new(TtlCache::from_config(&config, |_: u64| {}).unwrap());

    let report = run_workload(Arc::clone(&cache), &config).await.unwrap();

    assert_eq!(report.operations(), 9000);
    assert_eq!(report.gets, 5400);
    assert_eq!(report.puts, 2700);
    assert_eq!(report.removes, 900);
    assert!(cache.len() <= 50);
    assert_eq!(cache.stats().hits, report.hits);
}

#[tokio::test]
async fn test_workload_rejects_empty_key_space() {
    let config = Config {
        key_space: 0,
        ..Config::default()
    };
    let cache = Arc::new(TtlCache::from_config(&config, |_: u64| {}).unwrap());

    let result = run_workload(Arc::clone(&cache), &config).await;

    assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    assert!(cache.is_empty());
}
