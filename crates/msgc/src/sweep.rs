//! Sweep Phase - Reclaim Unmarked Objects
//!
//! Walks every arena slot once:
//! - unmarked: the object leaves the arena and the root set and is handed to
//!   the destroy action (a finalizer, or a plain drop)
//! - marked: the mark bit is cleared for the next cycle
//!
//! Sweep only ever acts on objects present in the arena, so an object cannot
//! be destroyed twice. It relies on a mark phase having run over the same
//! graph immediately before; the collector enforces that ordering.

use crate::heap::Heap;
use crate::marker::RootSet;
use crate::object::ManagedObject;
use crate::stats::GcTimer;
use serde::Serialize;

/// Sweep phase statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepStats {
    /// Objects examined
    pub objects_swept: usize,
    /// Objects destroyed
    pub objects_collected: usize,
    /// Objects retained with their mark cleared
    pub survivors: usize,
    /// Root entries removed because their object was destroyed
    pub roots_purged: usize,
    /// Duration of the phase in nanoseconds
    pub duration_ns: u64,
}

/// Sweeper - sweep phase driver
#[derive(Debug, Default)]
pub struct Sweeper;

impl Sweeper {
    pub fn new() -> Self {
        Self
    }

    /// Sweep the arena
    ///
    /// `destroy` receives ownership of every collected object.
    pub fn sweep<T, F>(&self, heap: &mut Heap<T>, roots: &mut RootSet, mut destroy: F) -> SweepStats
    where
        F: FnMut(ManagedObject<T>),
    {
        let timer = GcTimer::new();
        let mut stats = SweepStats::default();

        for slot in 0..heap.slot_count() {
            let marked = match heap.slot_mut(slot) {
                Some(object) => object.is_marked(),
                None => continue,
            };
            stats.objects_swept += 1;

            if marked {
                if let Some(object) = heap.slot_mut(slot) {
                    object.set_marked(false);
                }
                stats.survivors += 1;
                continue;
            }

            let Some(object) = heap.take_slot(slot) else {
                continue;
            };

            if let Some(root) = roots.purge(object.handle()) {
                log::warn!(
                    "Sweep destroyed root {}; the root set was out of sync with marking",
                    root
                );
                stats.roots_purged += 1;
            }

            log::trace!("Collecting {}", object.handle());
            stats.objects_collected += 1;
            destroy(object);
        }

        stats.duration_ns = timer.elapsed_ns();
        stats
    }
}
