//! # msgc - Stop-the-World Mark-and-Sweep Collector
//!
//! msgc manages a graph of objects of one payload type `T`. Objects live in
//! an arena owned by the collector and are named by stable handles; edges
//! and roots are handles too. A collection marks everything reachable from
//! the roots and destroys the rest, cycles included.
//!
//! ## Quick Start
//!
//! ```rust
//! use msgc::{GarbageCollector, GcConfig};
//!
//! fn main() -> Result<(), msgc::GcError> {
//!     let gc = GarbageCollector::new(GcConfig::default())?;
//!
//!     let a = gc.track_allocation("a");
//!     let b = gc.track_allocation("b");
//!     let c = gc.track_allocation("c");
//!
//!     gc.add_root(a)?;
//!     gc.add_reference(a, b)?;
//!     gc.add_reference(b, c)?;
//!
//!     // everything reachable survives
//!     assert_eq!(gc.collect()?.collected(), 0);
//!
//!     // dropping the root makes the whole chain garbage
//!     gc.remove_root(a);
//!     assert_eq!(gc.collect()?.collected(), 3);
//!     assert!(!gc.is_tracked(c));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────── GarbageCollector<T> ────────────────────────┐
//! │                                                                     │
//! │   Mutex ─┬─ Heap<T>     arena slots + handle table                  │
//! │          ├─ RootSet     insertion-ordered roots                     │
//! │          ├─ Marker      BFS over edges, mark queue                  │
//! │          ├─ Sweeper     destroy unmarked, clear surviving marks     │
//! │          └─ Compactor   slide live objects, rebind handles          │
//! │                                                                     │
//! │   GcStats (atomics)   GcLogger (event history)   GcConfig           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Collection Phases
//!
//! 1. **Mark**: every root is marked and traced; each reachable object is
//!    visited exactly once
//! 2. **Sweep**: unmarked objects leave the arena and the root set, marked
//!    ones are reset
//! 3. **Compact** (optional): live objects move to the front of the arena
//!
//! `collect()` runs 1 and 2 under one lock acquisition. The phases can be
//! driven individually through [`GarbageCollector::stop_the_world`]; a
//! sweep that does not directly follow a mark of the same graph is refused.
//!
//! ### Cycles
//!
//! Marking is the only authority on liveness, so unreachable cycles are
//! collected like any other garbage. [`GarbageCollector::handle_circular_references`]
//! reports cycles for leak hunting without affecting the collection.
//!
//! ## Thread Safety
//!
//! - `GarbageCollector<T>` is `Send + Sync` when `T: Send`
//! - Every operation, mutators included, serializes on the collector lock
//! - Statistics are atomics and can be read at any time
//!
//! ## Modules
//!
//! - [`config`]: Collector configuration and validation
//! - [`error`]: Error types for all msgc operations
//! - [`gc`]: Collector orchestration and the stop-the-world session
//! - [`heap`]: Object arena and handle table
//! - [`logging`]: Structured collector events
//! - [`marker`]: Mark phase, root set and cycle detection
//! - [`object`]: Handles and managed objects
//! - [`relocate`]: Arena compaction
//! - [`stats`]: Counters, timers and pause histogram
//! - [`sweep`]: Sweep phase

// Core
pub mod config;
pub mod error;
pub mod gc;

// Object model
pub mod heap;
pub mod object;

// Collection phases
pub mod marker;
pub mod relocate;
pub mod sweep;

// Monitoring
pub mod logging;
pub mod stats;

// Re-export main types for convenience
pub use config::{ConfigError, GcConfig};
pub use error::{GcError, Result};
pub use gc::{CollectionReport, CollectionSession, GarbageCollector, GcState};
pub use heap::HeapStats;
pub use marker::{CycleReport, MarkStats};
pub use object::{ManagedObject, ObjectHandle};
pub use relocate::CompactionStats;
pub use stats::{GcStats, GcSummary};
pub use sweep::SweepStats;

/// msgc version string from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create a collector with default configuration
///
/// ```rust
/// let gc = msgc::init::<String>()?;
/// assert_eq!(gc.object_count(), 0);
/// # Ok::<(), msgc::GcError>(())
/// ```
pub fn init<T>() -> Result<GarbageCollector<T>> {
    GarbageCollector::new(GcConfig::default())
}

/// Create a collector configured from `MSGC_*` environment variables
pub fn init_from_env<T>() -> Result<GarbageCollector<T>> {
    GarbageCollector::new(GcConfig::from_env())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_default() {
        assert!(init::<u32>().is_ok());
    }

    #[test]
    fn test_collector_is_send_sync() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<GarbageCollector<String>>();
        assert_send_sync::<GarbageCollector<Vec<u8>>>();
    }

    #[test]
    fn test_version_not_empty() {
        assert!(!VERSION.is_empty());
    }
}
