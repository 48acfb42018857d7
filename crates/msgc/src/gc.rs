//! GC Core Module - Collector Orchestration
//!
//! `GarbageCollector` owns the arena, the root set and the phase drivers
//! behind one mutex. Every entry point takes that lock, so mutators and
//! collections never overlap.
//!
//! Collection Cycle:
//! ```text
//!   Idle ──mark_all──▶ Marking ──▶ Marked ──sweep──▶ Sweeping ──▶ Idle
//!                                    │
//!                    compact / diagnose (transient, state restored)
//! ```
//!
//! `collect()` runs mark and sweep under a single lock acquisition. The
//! step-wise phases are only reachable through a [`CollectionSession`], a
//! guard that holds the lock for its whole lifetime.
//!
//! A sweep must follow a mark over the same graph. Every graph or root
//! mutation bumps a mutation epoch; the mark records the epoch it saw and
//! sweep refuses to run on a missing or outdated mark.

use crate::config::GcConfig;
use crate::error::{GcError, Result};
use crate::heap::{Heap, HeapStats};
use crate::logging::{self, GcEvent, GcLogger, GcLoggerConfig, LogLevel};
use crate::marker::{trace_reachable, CycleDetector, CycleReport, MarkStats, Marker, RootSet};
use crate::object::{ManagedObject, ObjectHandle};
use crate::relocate::{CompactionStats, Compactor};
use crate::stats::{GcStats, GcTimer};
use crate::sweep::{SweepStats, Sweeper};
use indexmap::{IndexMap, IndexSet};
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Collector phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GcState {
    /// No phase in progress, no pending marks
    Idle,
    /// Mark phase running
    Marking,
    /// Mark phase finished, sweep may run
    Marked,
    /// Sweep phase running
    Sweeping,
    /// Compaction running
    Compacting,
    /// Cycle diagnosis running
    Diagnosing,
}

/// Destroy action for collected objects
type Finalizer<T> = Box<dyn FnMut(ManagedObject<T>) + Send>;

/// Result of one `collect()` call
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    /// Cycle number, starting at 1
    pub cycle: u64,
    pub mark: MarkStats,
    pub sweep: SweepStats,
    /// Present when automatic compaction ran
    pub compaction: Option<CompactionStats>,
    /// Present when `report_cycles_before_sweep` is set
    pub cycles: Option<CycleReport>,
    /// Wall time of the whole cycle
    pub duration: Duration,
}

impl CollectionReport {
    /// Objects destroyed by the sweep
    pub fn collected(&self) -> usize {
        self.sweep.objects_collected
    }

    /// Objects that survived the sweep
    pub fn survivors(&self) -> usize {
        self.sweep.survivors
    }
}

/// Completed mark phase awaiting its sweep
#[derive(Debug, Clone, Copy)]
struct PendingMark {
    epoch: u64,
    cycle: u64,
    stats: MarkStats,
}

/// State outside the collector lock
struct Shared {
    config: GcConfig,
    stats: Arc<GcStats>,
    logger: GcLogger,
    cycle_count: AtomicU64,
}

impl Shared {
    /// Record on the collector's logger and mirror into the process-wide one
    fn log(&self, event: GcEvent) {
        if !self.logger.is_enabled() {
            return;
        }
        logging::log_event(event.clone());
        self.logger.log(event);
    }

    fn phase_end(&self, cycle: u64, phase: &str, duration_ns: u64) {
        self.log(GcEvent::PhaseEnd {
            cycle,
            phase: phase.to_string(),
            duration_ms: duration_ns as f64 / 1_000_000.0,
        });
    }
}

/// Everything guarded by the collector lock
struct GcInner<T> {
    heap: Heap<T>,
    roots: RootSet,
    marker: Marker,
    sweeper: Sweeper,
    compactor: Compactor,
    state: GcState,
    /// Bumped by every graph or root mutation
    epoch: u64,
    pending_mark: Option<PendingMark>,
    finalizer: Option<Finalizer<T>>,
}

impl<T> GcInner<T> {
    fn new(config: &GcConfig) -> Self {
        Self {
            heap: Heap::with_capacity(config.initial_capacity),
            roots: RootSet::new(),
            marker: Marker::new(),
            sweeper: Sweeper::new(),
            compactor: Compactor::new(f64::from(config.compaction_threshold)),
            state: GcState::Idle,
            epoch: 0,
            pending_mark: None,
            finalizer: None,
        }
    }

    #[inline]
    fn mutated(&mut self) {
        self.epoch += 1;
    }

    fn track_allocation(&mut self, data: T) -> ObjectHandle {
        let handle = self.heap.insert(data);
        self.mutated();
        log::trace!("Tracking {}", handle);
        handle
    }

    fn restore_allocation(&mut self, object: ManagedObject<T>) -> Result<ObjectHandle> {
        let handle = self.heap.insert_object(object)?;
        self.mutated();
        log::trace!("Restored {}", handle);
        Ok(handle)
    }

    fn remove_allocation(&mut self, handle: ObjectHandle) -> Result<ManagedObject<T>> {
        if self.roots.contains(handle) {
            return Err(GcError::RootedObject { handle });
        }
        let mut object = self.heap.release(handle)?;
        object.set_marked(false);
        self.mutated();
        log::trace!("Released {}", handle);
        Ok(object)
    }

    fn forget_allocation(&mut self, handle: ObjectHandle) -> bool {
        let forgotten = self.heap.forget(handle);
        if forgotten {
            log::trace!("Forgot {}", handle);
        }
        forgotten
    }

    fn discard_allocation(&mut self, handle: ObjectHandle) -> Result<()> {
        let object = self.remove_allocation(handle)?;
        self.heap.forget(handle);
        match self.finalizer.as_mut() {
            Some(finalize) => finalize(object),
            None => drop(object),
        }
        log::trace!("Discarded {}", handle);
        Ok(())
    }

    fn add_root(&mut self, handle: ObjectHandle, name: Option<&str>) -> Result<bool> {
        if !self.heap.contains(handle) {
            return Err(self.heap.missing(handle));
        }
        let added = self.roots.add(handle, name);
        if added {
            self.mutated();
        }
        Ok(added)
    }

    fn remove_root(&mut self, handle: ObjectHandle) -> bool {
        let removed = self.roots.remove(handle);
        if removed {
            self.mutated();
        }
        removed
    }

    fn add_reference(&mut self, from: ObjectHandle, to: ObjectHandle) -> Result<()> {
        if !self.heap.contains(to) {
            return Err(self.heap.missing(to));
        }
        self.heap.get_mut(from)?.add_reference(to);
        self.mutated();
        Ok(())
    }

    fn remove_reference(&mut self, from: ObjectHandle, to: ObjectHandle) -> Result<bool> {
        let removed = self.heap.get_mut(from)?.remove_reference(to);
        if removed {
            self.mutated();
        }
        Ok(removed)
    }

    fn mark_all(&mut self, shared: &Shared) -> MarkStats {
        if self.pending_mark.take().is_some() {
            let cleared = self.heap.clear_marks();
            log::debug!("Discarding previous mark ({} objects)", cleared);
        }

        let cycle = shared.cycle_count.load(Ordering::Relaxed) + 1;
        self.state = GcState::Marking;
        let stats = self.marker.mark_from_roots(&mut self.heap, &self.roots);
        self.pending_mark = Some(PendingMark {
            epoch: self.epoch,
            cycle,
            stats,
        });
        self.state = GcState::Marked;

        shared.log(GcEvent::Mark { cycle, stats });
        shared.phase_end(cycle, "mark", stats.duration_ns);
        stats
    }

    fn sweep(&mut self, shared: &Shared) -> Result<SweepStats> {
        let mark = self.pending_mark.ok_or(GcError::SweepWithoutMark)?;
        if mark.epoch != self.epoch {
            return Err(GcError::StaleMark {
                marked_epoch: mark.epoch,
                current_epoch: self.epoch,
            });
        }
        self.pending_mark = None;
        self.state = GcState::Sweeping;

        let finalizer = &mut self.finalizer;
        let stats = self
            .sweeper
            .sweep(&mut self.heap, &mut self.roots, |object| match finalizer {
                Some(finalize) => finalize(object),
                None => drop(object),
            });

        if stats.objects_collected > 0 {
            self.mutated();
        }
        self.state = GcState::Idle;
        shared.cycle_count.fetch_add(1, Ordering::Relaxed);

        if shared.config.stats_enabled {
            let pause = Duration::from_nanos(mark.stats.duration_ns.saturating_add(stats.duration_ns));
            shared
                .stats
                .record_collection(mark.stats.objects_marked, stats.objects_collected, pause);
        }

        if stats.roots_purged > 0 {
            shared.log(GcEvent::RootsPurged {
                cycle: mark.cycle,
                count: stats.roots_purged,
            });
        }
        shared.log(GcEvent::Sweep {
            cycle: mark.cycle,
            stats,
        });
        shared.phase_end(mark.cycle, "sweep", stats.duration_ns);

        Ok(stats)
    }

    fn collect(&mut self, shared: &Shared) -> Result<CollectionReport> {
        let timer = GcTimer::new();
        let cycle = shared.cycle_count.load(Ordering::Relaxed) + 1;

        shared.log(GcEvent::CycleStart {
            cycle,
            objects: self.heap.len(),
            roots: self.roots.len(),
        });
        log::debug!(
            "Collection {} starting: {} objects, {} roots",
            cycle,
            self.heap.len(),
            self.roots.len()
        );

        let mark = self.mark_all(shared);

        let cycles = if shared.config.report_cycles_before_sweep {
            Some(self.handle_circular_references(shared))
        } else {
            None
        };

        let sweep = self.sweep(shared)?;

        let compaction =
            if shared.config.compact_after_collect && self.compactor.should_compact(&self.heap) {
                Some(self.compact_memory(shared)?)
            } else {
                None
            };

        let duration = timer.elapsed();
        shared.log(GcEvent::CycleEnd {
            cycle,
            duration_ms: duration.as_secs_f64() * 1000.0,
            collected: sweep.objects_collected,
            survivors: sweep.survivors,
        });
        log::debug!(
            "Collection {} complete in {:.3}ms: collected {}, {} survivors",
            cycle,
            duration.as_secs_f64() * 1000.0,
            sweep.objects_collected,
            sweep.survivors
        );

        Ok(CollectionReport {
            cycle,
            mark,
            sweep,
            compaction,
            cycles,
            duration,
        })
    }

    fn compact_memory(&mut self, shared: &Shared) -> Result<CompactionStats> {
        let previous = self.state;
        self.state = GcState::Compacting;
        let result = self.compactor.compact(&mut self.heap);
        self.state = previous;

        let stats = result?;
        if shared.config.stats_enabled {
            shared
                .stats
                .record_compaction(stats.objects_moved, stats.slots_reclaimed);
        }
        shared.log(GcEvent::Compaction { stats });
        Ok(stats)
    }

    fn handle_circular_references(&mut self, shared: &Shared) -> CycleReport {
        let previous = self.state;
        self.state = GcState::Diagnosing;

        let mut detector = CycleDetector::new();
        detector.scan(&self.heap);
        let reachable = trace_reachable(&self.heap, &self.roots);
        let report = detector.into_report(&self.heap, &reachable);

        self.state = previous;

        if shared.config.stats_enabled {
            shared.stats.record_cycle_report(report.unreachable.len());
        }
        if !report.unreachable.is_empty() {
            log::warn!(
                "{} objects on unreachable cycles will be reclaimed by the next collection",
                report.unreachable.len()
            );
        }
        shared.log(GcEvent::Cycles {
            cycles: report.cycles.len(),
            cyclic_objects: report.cyclic_objects.len(),
            unreachable: report.unreachable.clone(),
        });
        report
    }

    fn detect_cycle(
        &self,
        start: ObjectHandle,
        visited: &mut IndexSet<ObjectHandle>,
        on_stack: &mut IndexSet<ObjectHandle>,
    ) -> bool {
        CycleDetector::new().detect_cycle(&self.heap, start, visited, on_stack)
    }

    /// Drop marks left by a mark phase that was never swept
    fn abandon_mark(&mut self) {
        if let Some(mark) = self.pending_mark.take() {
            let cleared = self.heap.clear_marks();
            log::debug!(
                "Cycle {}: mark abandoned without sweep, cleared {} marks",
                mark.cycle,
                cleared
            );
        }
        self.state = GcState::Idle;
    }
}

/// GarbageCollector - mark-and-sweep collector over a handle arena
///
/// ## Thread Safety
///
/// `GarbageCollector<T>` is `Send + Sync` when `T: Send`. Share it with
/// `Arc`; every method takes `&self` and serializes on the collector lock.
/// Statistics are atomics and readable without the lock.
///
/// ## Examples
///
/// ```rust
/// use msgc::{GarbageCollector, GcConfig};
///
/// let gc = GarbageCollector::new(GcConfig::default()).unwrap();
/// let root = gc.track_allocation("root");
/// let child = gc.track_allocation("child");
/// let garbage = gc.track_allocation("garbage");
///
/// gc.add_root(root).unwrap();
/// gc.add_reference(root, child).unwrap();
///
/// let report = gc.collect().unwrap();
/// assert_eq!(report.collected(), 1);
/// assert!(gc.is_tracked(child));
/// assert!(!gc.is_tracked(garbage));
/// ```
pub struct GarbageCollector<T> {
    inner: Mutex<GcInner<T>>,
    shared: Shared,
}

impl<T> GarbageCollector<T> {
    /// Create a new collector
    ///
    /// # Errors
    /// `Configuration` if the configuration fails validation.
    pub fn new(config: GcConfig) -> Result<Self> {
        config.validate()?;

        let logger = GcLogger::new(GcLoggerConfig {
            level: LogLevel::Trace,
            forward: true,
            json: false,
            max_events: config.max_event_history,
        });
        if !config.verbose {
            logger.disable();
        }

        Ok(Self {
            inner: Mutex::new(GcInner::new(&config)),
            shared: Shared {
                config,
                stats: Arc::new(GcStats::new()),
                logger,
                cycle_count: AtomicU64::new(0),
            },
        })
    }

    /// Register a new object, returns its handle
    ///
    /// The object starts unmarked. Unless it is rooted or referenced before
    /// the next collection, that collection destroys it.
    pub fn track_allocation(&self, data: T) -> ObjectHandle {
        self.inner.lock().track_allocation(data)
    }

    /// Re-track an object handed out by `remove_allocation`
    ///
    /// The object keeps its handle, so edges that still point at it become
    /// live again. An object built with `ManagedObject::new` gets a fresh
    /// handle.
    ///
    /// # Errors
    /// - `AlreadyTracked` if the handle is tracked
    /// - `UntrackedObject` if the handle was not issued by this collector
    pub fn restore_allocation(&self, object: ManagedObject<T>) -> Result<ObjectHandle> {
        self.inner.lock().restore_allocation(object)
    }

    /// Stop tracking an object without destroying it
    ///
    /// Edges from other objects to the removed handle are left in place and
    /// skipped by marking until the object is restored.
    ///
    /// # Errors
    /// - `RootedObject` if the object is still a root
    /// - `UntrackedObject` / `StaleHandle` if it is not tracked
    pub fn remove_allocation(&self, handle: ObjectHandle) -> Result<ManagedObject<T>> {
        self.inner.lock().remove_allocation(handle)
    }

    /// Declare a removed object gone for good
    ///
    /// The collector remembers handles handed out by `remove_allocation` so
    /// they can be restored. Call this after dropping such an object; the
    /// handle then reads as `StaleHandle` and can no longer be restored.
    /// Returns whether `handle` was released.
    pub fn forget_allocation(&self, handle: ObjectHandle) -> bool {
        self.inner.lock().forget_allocation(handle)
    }

    /// Remove an object and destroy it immediately
    ///
    /// Runs the finalizer, if any, and leaves the handle stale.
    ///
    /// # Errors
    /// Same as `remove_allocation`.
    pub fn discard_allocation(&self, handle: ObjectHandle) -> Result<()> {
        self.inner.lock().discard_allocation(handle)
    }

    /// Add a root, returns whether it was newly added
    pub fn add_root(&self, handle: ObjectHandle) -> Result<bool> {
        self.inner.lock().add_root(handle, None)
    }

    /// Add a root with a diagnostic name
    pub fn add_named_root(&self, handle: ObjectHandle, name: &str) -> Result<bool> {
        self.inner.lock().add_root(handle, Some(name))
    }

    /// Remove a root, returns whether it was present
    pub fn remove_root(&self, handle: ObjectHandle) -> bool {
        self.inner.lock().remove_root(handle)
    }

    /// Add an edge `from -> to`
    ///
    /// # Errors
    /// `UntrackedObject` / `StaleHandle` if either end is not tracked.
    pub fn add_reference(&self, from: ObjectHandle, to: ObjectHandle) -> Result<()> {
        self.inner.lock().add_reference(from, to)
    }

    /// Remove one edge `from -> to`, returns whether it existed
    pub fn remove_reference(&self, from: ObjectHandle, to: ObjectHandle) -> Result<bool> {
        self.inner.lock().remove_reference(from, to)
    }

    /// Run a full collection: mark, then sweep, under one lock acquisition
    ///
    /// Compacts afterwards when `compact_after_collect` is set and the arena
    /// fragmentation reaches `compaction_threshold`.
    pub fn collect(&self) -> Result<CollectionReport> {
        self.stop_the_world().collect()
    }

    /// Hold the collector lock and drive the phases step by step
    ///
    /// Every other thread touching the collector blocks until the session is
    /// dropped. Marks left by a `mark_all` that was never swept are cleared
    /// on drop.
    pub fn stop_the_world(&self) -> CollectionSession<'_, T> {
        CollectionSession {
            inner: self.inner.lock(),
            shared: &self.shared,
        }
    }

    /// Slide live objects to the front of the arena and trim the free tail
    ///
    /// Handles stay valid; only their slots change.
    pub fn compact_memory(&self) -> Result<CompactionStats> {
        self.inner.lock().compact_memory(&self.shared)
    }

    /// Report every reference cycle and which of them are unreachable
    ///
    /// Diagnostic only: marks and liveness are untouched.
    pub fn handle_circular_references(&self) -> CycleReport {
        self.inner.lock().handle_circular_references(&self.shared)
    }

    /// Depth-first cycle search from `start`
    ///
    /// See [`CycleDetector::detect_cycle`] for the meaning of `visited` and
    /// `on_stack`.
    pub fn detect_cycle(
        &self,
        start: ObjectHandle,
        visited: &mut IndexSet<ObjectHandle>,
        on_stack: &mut IndexSet<ObjectHandle>,
    ) -> bool {
        self.inner.lock().detect_cycle(start, visited, on_stack)
    }

    /// Install a destroy action for collected objects
    ///
    /// Runs under the collector lock; it must not call back into the
    /// collector.
    pub fn set_finalizer<F>(&self, finalizer: F)
    where
        F: FnMut(ManagedObject<T>) + Send + 'static,
    {
        self.inner.lock().finalizer = Some(Box::new(finalizer));
    }

    /// Go back to dropping collected objects
    pub fn clear_finalizer(&self) {
        self.inner.lock().finalizer = None;
    }

    pub fn is_tracked(&self, handle: ObjectHandle) -> bool {
        self.inner.lock().heap.contains(handle)
    }

    pub fn is_root(&self, handle: ObjectHandle) -> bool {
        self.inner.lock().roots.contains(handle)
    }

    pub fn object_count(&self) -> usize {
        self.inner.lock().heap.len()
    }

    pub fn root_count(&self) -> usize {
        self.inner.lock().roots.len()
    }

    /// Root handles in registration order
    pub fn roots(&self) -> Vec<ObjectHandle> {
        self.inner.lock().roots.handles()
    }

    /// Name given to a root by `add_named_root`
    pub fn root_name(&self, handle: ObjectHandle) -> Option<String> {
        self.inner.lock().roots.name(handle).map(str::to_string)
    }

    /// Tracked handles in arena order
    pub fn handles(&self) -> Vec<ObjectHandle> {
        self.inner.lock().heap.handles()
    }

    /// Outgoing edges of an object
    pub fn references(&self, handle: ObjectHandle) -> Result<Vec<ObjectHandle>> {
        Ok(self.inner.lock().heap.get(handle)?.references().to_vec())
    }

    /// Run `f` on a tracked object under the collector lock
    pub fn with_object<R>(
        &self,
        handle: ObjectHandle,
        f: impl FnOnce(&ManagedObject<T>) -> R,
    ) -> Result<R> {
        let inner = self.inner.lock();
        Ok(f(inner.heap.get(handle)?))
    }

    /// Run `f` on a tracked object's payload under the collector lock
    ///
    /// Payload changes are not graph mutations; edges change only through
    /// `add_reference` / `remove_reference`.
    pub fn with_data_mut<R>(&self, handle: ObjectHandle, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut inner = self.inner.lock();
        Ok(f(inner.heap.get_mut(handle)?.data_mut()))
    }

    pub fn heap_stats(&self) -> HeapStats {
        self.inner.lock().heap.get_stats()
    }

    pub fn stats(&self) -> Arc<GcStats> {
        self.shared.stats.clone()
    }

    pub fn state(&self) -> GcState {
        self.inner.lock().state
    }

    /// Completed sweeps
    pub fn cycle_count(&self) -> u64 {
        self.shared.cycle_count.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &GcConfig {
        &self.shared.config
    }

    /// Per-collector event history, active when `verbose` is set
    pub fn logger(&self) -> &GcLogger {
        &self.shared.logger
    }

    /// Get diagnostic information
    pub fn diagnostics(&self) -> IndexMap<String, String> {
        let mut diagnostics = IndexMap::new();
        let inner = self.inner.lock();

        diagnostics.insert("state".to_string(), format!("{:?}", inner.state));
        diagnostics.insert(
            "cycle_count".to_string(),
            self.cycle_count().to_string(),
        );
        diagnostics.insert("epoch".to_string(), inner.epoch.to_string());
        diagnostics.insert(
            "pending_mark".to_string(),
            inner.pending_mark.is_some().to_string(),
        );

        let heap_stats = inner.heap.get_stats();
        diagnostics.insert(
            "live_objects".to_string(),
            heap_stats.live_objects.to_string(),
        );
        diagnostics.insert("slot_count".to_string(), heap_stats.slot_count.to_string());
        diagnostics.insert(
            "fragmentation".to_string(),
            format!("{:.2}", heap_stats.fragmentation),
        );

        diagnostics.insert(
            "released".to_string(),
            inner.heap.released_count().to_string(),
        );

        let root_stats = inner.roots.get_stats();
        diagnostics.insert("roots".to_string(), root_stats.live_roots.to_string());
        diagnostics.insert("roots_purged".to_string(), root_stats.purged.to_string());
        let named: Vec<String> = inner
            .roots
            .iter()
            .filter(|root| root.name.is_some())
            .map(|root| root.to_string())
            .collect();
        diagnostics.insert("named_roots".to_string(), named.join(", "));

        diagnostics.insert(
            "finalizer".to_string(),
            inner.finalizer.is_some().to_string(),
        );

        diagnostics
    }
}

/// CollectionSession - stop-the-world guard
///
/// Holds the collector lock until dropped. Offers the individual phases and
/// the graph mutators; a mutation between `mark_all` and `sweep` makes the
/// sweep fail with `StaleMark`.
///
/// ```rust
/// use msgc::{GarbageCollector, GcConfig, GcError};
///
/// let gc = GarbageCollector::new(GcConfig::default()).unwrap();
/// let a = gc.track_allocation(1u32);
/// gc.add_root(a).unwrap();
///
/// let mut session = gc.stop_the_world();
/// assert!(matches!(session.sweep(), Err(GcError::SweepWithoutMark)));
/// session.mark_all();
/// assert_eq!(session.sweep().unwrap().survivors, 1);
/// ```
pub struct CollectionSession<'a, T> {
    inner: MutexGuard<'a, GcInner<T>>,
    shared: &'a Shared,
}

impl<'a, T> CollectionSession<'a, T> {
    /// Mark every object reachable from the roots
    ///
    /// Discards the marks of an earlier unswept `mark_all` first.
    pub fn mark_all(&mut self) -> MarkStats {
        self.inner.mark_all(self.shared)
    }

    /// Destroy every unmarked object and clear surviving marks
    ///
    /// # Errors
    /// - `SweepWithoutMark` if no `mark_all` ran since the last sweep
    /// - `StaleMark` if the graph changed since `mark_all`
    pub fn sweep(&mut self) -> Result<SweepStats> {
        self.inner.sweep(self.shared)
    }

    /// Mark and sweep
    pub fn collect(&mut self) -> Result<CollectionReport> {
        self.inner.collect(self.shared)
    }

    pub fn compact_memory(&mut self) -> Result<CompactionStats> {
        self.inner.compact_memory(self.shared)
    }

    pub fn handle_circular_references(&mut self) -> CycleReport {
        self.inner.handle_circular_references(self.shared)
    }

    pub fn detect_cycle(
        &self,
        start: ObjectHandle,
        visited: &mut IndexSet<ObjectHandle>,
        on_stack: &mut IndexSet<ObjectHandle>,
    ) -> bool {
        self.inner.detect_cycle(start, visited, on_stack)
    }

    pub fn track_allocation(&mut self, data: T) -> ObjectHandle {
        self.inner.track_allocation(data)
    }

    pub fn add_root(&mut self, handle: ObjectHandle) -> Result<bool> {
        self.inner.add_root(handle, None)
    }

    pub fn remove_root(&mut self, handle: ObjectHandle) -> bool {
        self.inner.remove_root(handle)
    }

    pub fn add_reference(&mut self, from: ObjectHandle, to: ObjectHandle) -> Result<()> {
        self.inner.add_reference(from, to)
    }

    pub fn remove_reference(&mut self, from: ObjectHandle, to: ObjectHandle) -> Result<bool> {
        self.inner.remove_reference(from, to)
    }

    /// Mark bit of a tracked object
    pub fn is_marked(&self, handle: ObjectHandle) -> Result<bool> {
        Ok(self.inner.heap.get(handle)?.is_marked())
    }

    pub fn is_tracked(&self, handle: ObjectHandle) -> bool {
        self.inner.heap.contains(handle)
    }

    pub fn object_count(&self) -> usize {
        self.inner.heap.len()
    }

    pub fn state(&self) -> GcState {
        self.inner.state
    }
}

impl<'a, T> Drop for CollectionSession<'a, T> {
    fn drop(&mut self) {
        self.inner.abandon_mark();
    }
}
