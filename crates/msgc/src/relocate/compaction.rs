//! Compaction - Sliding Arena Compaction
//!
//! Single left-to-right pass. `write` trails `read`; every slot in
//! `write..read` is a hole, so each occupied slot found at `read` can move
//! straight into `write`.

use crate::error::Result;
use crate::heap::Heap;
use crate::stats::GcTimer;
use serde::Serialize;

/// Compaction statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct CompactionStats {
    /// Objects moved to a lower slot
    pub objects_moved: usize,
    /// Slots removed from the arena tail
    pub slots_reclaimed: usize,
    /// Arena length before compaction
    pub slots_before: usize,
    /// Arena length after compaction
    pub slots_after: usize,
    /// Fragmentation ratio before compaction
    pub fragmentation_before: f64,
    /// Duration of the pass in nanoseconds
    pub duration_ns: u64,
}

/// Compactor - arena defragmentation
#[derive(Debug, Clone, Copy)]
pub struct Compactor {
    /// Fragmentation ratio at which `should_compact` says yes
    threshold: f64,
}

impl Compactor {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Whether the arena is fragmented enough to be worth compacting
    pub fn should_compact<T>(&self, heap: &Heap<T>) -> bool {
        let stats = heap.get_stats();
        stats.free_slots > 0 && stats.fragmentation >= self.threshold
    }

    /// Compact the arena
    ///
    /// Every tracked handle resolves to the same object afterwards.
    pub fn compact<T>(&self, heap: &mut Heap<T>) -> Result<CompactionStats> {
        let timer = GcTimer::new();
        let before = heap.get_stats();
        let mut moved = 0;
        let mut write = 0;

        for read in 0..heap.slot_count() {
            if heap.slot_mut(read).is_none() {
                continue;
            }
            if read != write {
                heap.move_slot(read, write)?;
                moved += 1;
            }
            write += 1;
        }

        let reclaimed = heap.truncate_free_tail();

        Ok(CompactionStats {
            objects_moved: moved,
            slots_reclaimed: reclaimed,
            slots_before: before.slot_count,
            slots_after: heap.slot_count(),
            fragmentation_before: before.fragmentation,
            duration_ns: timer.elapsed_ns(),
        })
    }
}

impl Default for Compactor {
    fn default() -> Self {
        Self::new(0.5)
    }
}
