//! GC Concurrency Tests - Mutators and Collectors on Shared Collector
//!
//! Every entry point serializes on the collector lock. These tests run
//! mutator threads against collector threads and check that nothing rooted
//! or reachable from a root is ever destroyed.

mod common;

use common::{GcFixture, TEST_TIMEOUT};
use msgc::{GarbageCollector, GcConfig, GcError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

/// Each mutator keeps a rooted chain and grows it while collectors run
///
/// **Invariant verified:** rooted chains survive every interleaving
#[test]
fn test_rooted_chains_survive_concurrent_collections() {
    let fixture = GcFixture::with_defaults();
    let gc = Arc::clone(&fixture.gc);
    let mutators = 4;
    let collectors = 2;
    let links_per_mutator = 200;
    let barrier = Arc::new(Barrier::new(mutators + collectors));
    let done = Arc::new(AtomicBool::new(false));

    let mut collector_threads = Vec::new();
    for _ in 0..collectors {
        let gc = Arc::clone(&gc);
        let barrier = Arc::clone(&barrier);
        let done = Arc::clone(&done);
        collector_threads.push(thread::spawn(move || {
            barrier.wait();
            let mut runs = 0u64;
            while !done.load(Ordering::Acquire) {
                gc.collect().expect("collection should succeed");
                runs += 1;
            }
            runs
        }));
    }

    let mut mutator_threads = Vec::new();
    for id in 0..mutators {
        let gc = Arc::clone(&gc);
        let barrier = Arc::clone(&barrier);
        mutator_threads.push(thread::spawn(move || {
            let head = gc.track_allocation(id * 10_000);
            gc.add_root(head).expect("fresh object can be rooted");
            barrier.wait();

            let mut chain = vec![head];
            let mut tail = head;
            for i in 1..=links_per_mutator {
                let next = gc.track_allocation(id * 10_000 + i);
                // a collection may run between these two calls and reclaim
                // `next`; the link is retried with a new object
                match gc.add_reference(tail, next) {
                    Ok(()) => {
                        chain.push(next);
                        tail = next;
                    },
                    Err(GcError::StaleHandle { .. }) => continue,
                    Err(e) => panic!("unexpected error: {}", e),
                }
            }
            chain
        }));
    }

    let chains: Vec<_> = mutator_threads
        .into_iter()
        .map(|t| t.join().expect("mutator should not panic"))
        .collect();
    done.store(true, Ordering::Release);
    for t in collector_threads {
        t.join().expect("collector should not panic");
    }

    gc.collect().expect("final collection");
    for chain in &chains {
        for &handle in chain {
            assert!(gc.is_tracked(handle), "linked object {} was destroyed", handle);
        }
    }
    let linked: usize = chains.iter().map(Vec::len).sum();
    assert_eq!(gc.object_count(), linked);
}

/// Unrooted allocations from many threads are all reclaimed eventually
#[test]
fn test_garbage_from_many_threads_is_reclaimed() {
    let gc: Arc<GarbageCollector<Vec<u8>>> =
        Arc::new(GarbageCollector::new(GcConfig::default()).expect("default config"));
    let threads = 8;
    let per_thread = 500;
    let barrier = Arc::new(Barrier::new(threads));

    let workers: Vec<_> = (0..threads)
        .map(|_| {
            let gc = Arc::clone(&gc);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..per_thread {
                    gc.track_allocation(vec![0u8; 16]);
                    if i % 100 == 0 {
                        gc.collect().expect("collection should succeed");
                    }
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("worker should not panic");
    }

    gc.collect().expect("final collection");
    assert_eq!(gc.object_count(), 0);

    let summary = gc.stats().summary();
    assert_eq!(summary.objects_collected, (threads * per_thread) as u64);
}

/// A session blocks other threads until it is dropped
#[test]
fn test_session_excludes_mutators() {
    let fixture = GcFixture::graph(1, &[], &[0]);
    let gc = Arc::clone(&fixture.gc);
    let started = Arc::new(Barrier::new(2));

    let mut session = fixture.gc.stop_the_world();
    session.mark_all();

    let mutator = {
        let gc = Arc::clone(&gc);
        let started = Arc::clone(&started);
        thread::spawn(move || {
            started.wait();
            let start = Instant::now();
            let handle = gc.track_allocation(7);
            (handle, start.elapsed())
        })
    };

    started.wait();
    thread::sleep(std::time::Duration::from_millis(50));
    // the mutator cannot have run, so the mark is still current
    let stats = session.sweep().expect("no mutation could interleave");
    assert_eq!(stats.survivors, 1);
    drop(session);

    let (handle, waited) = mutator.join().expect("mutator should not panic");
    assert!(waited >= std::time::Duration::from_millis(40));
    assert!(waited < TEST_TIMEOUT);
    assert!(gc.is_tracked(handle));
}

/// Readers see consistent counters while collections run
#[test]
fn test_stats_readable_during_collections() {
    let fixture = GcFixture::graph(64, &[], &[0]);
    let gc = Arc::clone(&fixture.gc);
    let stop = Arc::new(AtomicBool::new(false));

    let reader = {
        let gc = Arc::clone(&gc);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut last = 0;
            while !stop.load(Ordering::Acquire) {
                let cycles = gc.stats().summary().total_cycles;
                assert!(cycles >= last, "cycle counter went backwards");
                last = cycles;
            }
        })
    };

    for _ in 0..50 {
        gc.track_allocation(0);
        gc.collect().expect("collection should succeed");
    }
    stop.store(true, Ordering::Release);
    reader.join().expect("reader should not panic");

    assert_eq!(gc.cycle_count(), 50);
    assert_eq!(gc.object_count(), 1);
}
