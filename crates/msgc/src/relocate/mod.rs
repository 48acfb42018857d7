//! Relocate Module - Arena Compaction
//!
//! Sweeps and releases leave holes in the arena. Compaction slides the
//! surviving objects towards slot 0, keeping their relative order, and drops
//! the empty tail.
//!
//! Edges and roots are handles, not slot indices, so moving an object only
//! requires rebinding its handle in the handle table:
//!
//! ```text
//! before:  [ A | -- | B | -- | C ]      A=#1 B=#2 C=#3
//! after:   [ A | B | C ]                #2: 2 -> 1, #3: 4 -> 2
//! ```

pub mod compaction;

pub use compaction::{CompactionStats, Compactor};
