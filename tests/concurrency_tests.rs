//! Concurrency Tests
//!
//! Many threads hammering shared shards with interleaved Set/Get/Clear, the
//! lazy-delete race, and the full two-million-key Set/Get scenario.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use shardcache::bench::{self, BenchConfig};
use shardcache::ShardedCache;

const THREADS: usize = 8;

/// Every worker issues `ops_per_thread` operations over a small shared key
/// range, so workers constantly collide on the same shards and keys.
fn stress(shard_count: usize, ops_per_thread: usize) {
    let cache = Arc::new(ShardedCache::new(shard_count).unwrap());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..ops_per_thread {
                    let key = format!("key{}", (i * 7 + t) % 512);
                    match i % 100 {
                        0 if t == 0 => cache.clear(),
                        n if n % 3 == 0 => cache.set(&key, (t, i), 3600),
                        n if n % 11 == 0 => cache.set(&key, (t, i), -1),
                        _ => {
                            // Values are written whole, so any hit is a pair some
                            // worker actually stored
                            if let Some((writer, op)) = cache.get(&key) {
                                assert!(writer < THREADS);
                                assert!(op < ops_per_thread);
                            }
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    assert!(cache.len() <= 512);
}

#[test]
fn test_stress_single_shard() {
    // 8 threads x 125k = 1M operations through one lock
    stress(1, 125_000);
}

#[test]
fn test_stress_four_shards() {
    stress(4, 125_000);
}

#[test]
fn test_stress_many_shards() {
    stress(256, 125_000);
}

#[test]
fn test_lazy_delete_never_discards_fresh_writes() {
    let cache = Arc::new(ShardedCache::new(1).unwrap());
    let done = Arc::new(AtomicBool::new(false));

    // One writer keeps flipping the key between an expired and a fresh entry;
    // readers race their lazy deletes against it.
    let writer = {
        let cache = Arc::clone(&cache);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for i in 0..50_000u32 {
                cache.set("contended", i, -1);
                cache.set("contended", i, 3600);
            }
            done.store(true, Ordering::Release);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let _ = cache.get("contended");
                }
            })
        })
        .collect();

    writer.join().expect("writer panicked");
    for reader in readers {
        reader.join().expect("reader panicked");
    }

    // The last write was fresh; no reader may have removed it
    assert_eq!(cache.get("contended"), Some(49_999));
}

#[test]
fn test_writers_on_distinct_shards_do_not_interfere() {
    let cache = Arc::new(ShardedCache::new(64).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..10_000 {
                    cache.set(&format!("t{}-{}", t, i), i, 3600);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer panicked");
    }

    assert_eq!(cache.len(), THREADS * 10_000);
    for t in 0..THREADS {
        assert_eq!(cache.get(&format!("t{}-9999", t)), Some(9_999));
    }
}

#[test]
fn test_end_to_end_two_million_keys() {
    let cache = ShardedCache::new(256).unwrap();
    let config = BenchConfig {
        operations: 2_000_000,
        workers: THREADS,
        ttl: 3600,
    };

    let report = bench::run(&cache, &config).unwrap();

    assert_eq!(report.set.operations, 2_000_000);
    assert_eq!(report.get.operations, 2_000_000);
    assert_eq!(report.get.hits, 2_000_000, "every Get must return its i");
    assert_eq!(cache.len(), 2_000_000);
}
