//! Stats Module - Collector Performance Monitoring
//!
//! Collects collector statistics for:
//! - Performance tuning
//! - Leak hunting (objects collected per cycle, unreachable cycles)
//! - Debugging
//!
//! Counters are atomics so they can be read without the collector lock.

pub mod histogram;
pub mod timer;

pub use histogram::Histogram;
pub use timer::GcTimer;

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// GcStats - statistics collector
///
/// Central repository for all collector metrics.
#[derive(Debug)]
pub struct GcStats {
    /// Completed collection cycles
    total_cycles: AtomicU64,
    /// Objects marked across all cycles
    objects_marked: AtomicU64,
    /// Objects destroyed by sweeps
    objects_collected: AtomicU64,
    /// Compaction passes that moved or reclaimed anything
    compactions: AtomicU64,
    /// Objects moved by compaction
    objects_moved: AtomicU64,
    /// Arena slots reclaimed by compaction
    slots_reclaimed: AtomicU64,
    /// Unreachable cyclic objects reported by diagnostics
    cyclic_garbage_reported: AtomicU64,
    /// Pause time statistics (nanoseconds, mark + sweep)
    pause_stats: Arc<Histogram>,
    /// Start time
    start_time: Instant,
}

impl GcStats {
    /// Create new stats collector
    pub fn new() -> Self {
        Self {
            total_cycles: AtomicU64::new(0),
            objects_marked: AtomicU64::new(0),
            objects_collected: AtomicU64::new(0),
            compactions: AtomicU64::new(0),
            objects_moved: AtomicU64::new(0),
            slots_reclaimed: AtomicU64::new(0),
            cyclic_garbage_reported: AtomicU64::new(0),
            pause_stats: Arc::new(Histogram::new()),
            start_time: Instant::now(),
        }
    }

    /// Record a completed mark + sweep cycle
    pub fn record_collection(&self, marked: usize, collected: usize, pause: Duration) {
        self.total_cycles.fetch_add(1, Ordering::Relaxed);
        self.objects_marked.fetch_add(marked as u64, Ordering::Relaxed);
        self.objects_collected
            .fetch_add(collected as u64, Ordering::Relaxed);
        self.pause_stats
            .record(u64::try_from(pause.as_nanos()).unwrap_or(u64::MAX));
    }

    /// Record a compaction pass
    pub fn record_compaction(&self, moved: usize, reclaimed: usize) {
        if moved == 0 && reclaimed == 0 {
            return;
        }
        self.compactions.fetch_add(1, Ordering::Relaxed);
        self.objects_moved.fetch_add(moved as u64, Ordering::Relaxed);
        self.slots_reclaimed
            .fetch_add(reclaimed as u64, Ordering::Relaxed);
    }

    /// Record a cycle diagnosis
    pub fn record_cycle_report(&self, unreachable: usize) {
        self.cyclic_garbage_reported
            .fetch_add(unreachable as u64, Ordering::Relaxed);
    }

    /// Get pause time histogram
    pub fn pause_histogram(&self) -> Arc<Histogram> {
        self.pause_stats.clone()
    }

    /// Get summary statistics
    pub fn summary(&self) -> GcSummary {
        GcSummary {
            total_cycles: self.total_cycles.load(Ordering::Relaxed),
            objects_marked: self.objects_marked.load(Ordering::Relaxed),
            objects_collected: self.objects_collected.load(Ordering::Relaxed),
            compactions: self.compactions.load(Ordering::Relaxed),
            objects_moved: self.objects_moved.load(Ordering::Relaxed),
            slots_reclaimed: self.slots_reclaimed.load(Ordering::Relaxed),
            cyclic_garbage_reported: self.cyclic_garbage_reported.load(Ordering::Relaxed),
            avg_pause_ms: self.pause_stats.mean() as f64 / 1_000_000.0,
            max_pause_ms: self.pause_stats.max() as f64 / 1_000_000.0,
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Reset statistics
    pub fn reset(&self) {
        self.total_cycles.store(0, Ordering::Relaxed);
        self.objects_marked.store(0, Ordering::Relaxed);
        self.objects_collected.store(0, Ordering::Relaxed);
        self.compactions.store(0, Ordering::Relaxed);
        self.objects_moved.store(0, Ordering::Relaxed);
        self.slots_reclaimed.store(0, Ordering::Relaxed);
        self.cyclic_garbage_reported.store(0, Ordering::Relaxed);
        self.pause_stats.clear();
    }
}

impl Default for GcStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct GcSummary {
    /// Completed collection cycles
    pub total_cycles: u64,
    /// Objects marked across all cycles
    pub objects_marked: u64,
    /// Objects destroyed by sweeps
    pub objects_collected: u64,
    /// Compaction passes
    pub compactions: u64,
    /// Objects moved by compaction
    pub objects_moved: u64,
    /// Arena slots reclaimed by compaction
    pub slots_reclaimed: u64,
    /// Unreachable cyclic objects reported by diagnostics
    pub cyclic_garbage_reported: u64,
    /// Average pause time (ms)
    pub avg_pause_ms: f64,
    /// Max pause time (ms)
    pub max_pause_ms: f64,
    /// Uptime (seconds)
    pub uptime_secs: u64,
}
