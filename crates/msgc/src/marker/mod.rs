//! Marker Module - Mark Phase
//!
//! Flags every object reachable from the root set.
//!
//! Marking Algorithm:
//! 1. Mark each tracked root and push it on the mark queue
//! 2. Pop an object, walk its edges, mark and push every unmarked target
//! 3. Stop when the queue is empty
//!
//! An object is pushed only on its false -> true mark transition, so every
//! reachable object is traced exactly once. Cycles, self-edges and duplicate
//! edges terminate through that rule alone; no cycle avoidance is needed.
//!
//! The mark phase is the only authority on liveness. Cycle diagnosis lives in
//! [`cycles`] and never touches mark bits.

pub mod cycles;
pub mod mark_queue;
pub mod roots;

pub use cycles::{CycleDetector, CycleReport};
pub use mark_queue::{MarkQueue, MarkQueueStats};
pub use roots::{RootDescriptor, RootSet, RootStats};

use crate::heap::Heap;
use crate::object::ObjectHandle;
use crate::stats::GcTimer;
use indexmap::IndexSet;
use serde::Serialize;

/// Mark phase statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkStats {
    /// Roots examined
    pub roots_scanned: usize,
    /// Roots whose handle was not tracked (always 0 while roots are admitted
    /// only for tracked objects)
    pub stale_roots: usize,
    /// Objects flipped from unmarked to marked
    pub objects_marked: usize,
    /// Edges followed
    pub edges_traced: usize,
    /// Edges and roots that led to an object already marked this phase
    pub already_marked: usize,
    /// Edges to handles no longer tracked
    pub dangling_edges: usize,
    /// Duration of the phase in nanoseconds
    pub duration_ns: u64,
}

/// Marker - mark phase driver
///
/// Owns the mark queue and a scratch buffer reused across phases.
#[derive(Debug, Default)]
pub struct Marker {
    queue: MarkQueue,
    scratch: Vec<ObjectHandle>,
}

impl Marker {
    /// Create new marker
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark everything reachable from `roots`
    ///
    /// Expects every surviving object to be unmarked on entry, which sweep
    /// guarantees between cycles.
    pub fn mark_from_roots<T>(&mut self, heap: &mut Heap<T>, roots: &RootSet) -> MarkStats {
        let timer = GcTimer::new();
        let mut stats = MarkStats::default();
        self.queue.reset();

        for root in roots.iter() {
            stats.roots_scanned += 1;
            match heap.lookup_mut(root.handle) {
                Some(object) if !object.is_marked() => {
                    object.set_marked(true);
                    stats.objects_marked += 1;
                    self.queue.push(root.handle);
                },
                Some(_) => stats.already_marked += 1,
                None => {
                    log::warn!("Root {} does not name a tracked object", root.handle);
                    stats.stale_roots += 1;
                },
            }
        }

        while let Some(handle) = self.queue.pop() {
            self.scratch.clear();
            match heap.lookup(handle) {
                Some(object) => self.scratch.extend_from_slice(object.references()),
                None => continue,
            }

            for &target in &self.scratch {
                stats.edges_traced += 1;
                match heap.lookup_mut(target) {
                    Some(object) if !object.is_marked() => {
                        object.set_marked(true);
                        stats.objects_marked += 1;
                        self.queue.push(target);
                    },
                    Some(_) => stats.already_marked += 1,
                    None => {
                        log::trace!("Skipping dangling edge {} -> {}", handle, target);
                        stats.dangling_edges += 1;
                    },
                }
            }
        }

        stats.duration_ns = timer.elapsed_ns();
        stats
    }

    /// Mark queue statistics of the last phase
    pub fn queue_stats(&self) -> MarkQueueStats {
        self.queue.stats()
    }
}

/// Compute the set of objects reachable from `roots` without touching mark
/// bits
///
/// Used by diagnostics that must not disturb collector state.
pub fn trace_reachable<T>(heap: &Heap<T>, roots: &RootSet) -> IndexSet<ObjectHandle> {
    let mut reachable = IndexSet::new();
    let mut pending: Vec<ObjectHandle> = Vec::new();

    for handle in roots.handles() {
        if heap.contains(handle) && reachable.insert(handle) {
            pending.push(handle);
        }
    }

    while let Some(handle) = pending.pop() {
        let Some(object) = heap.lookup(handle) else {
            continue;
        };
        for &target in object.references() {
            if heap.contains(target) && reachable.insert(target) {
                pending.push(target);
            }
        }
    }

    reachable
}
