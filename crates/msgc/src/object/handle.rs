//! Object Handle - Stable identity for managed objects
//!
//! A handle is an opaque integer minted by the collector when an object is
//! first tracked. Handles are never reused, so a handle to a collected object
//! can only ever resolve to "stale", never to some newer object.
//!
//! Edges and roots are stored as handles. The arena maps handles to slots,
//! which is what lets compaction move objects without fixing up edges.

use serde::Serialize;
use std::fmt;

/// Handle value reserved for "not yet tracked"
const UNASSIGNED: u64 = 0;

/// ObjectHandle - opaque, stable object identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectHandle(u64);

impl ObjectHandle {
    /// Handle carried by objects that have never been tracked
    pub const UNASSIGNED: ObjectHandle = ObjectHandle(UNASSIGNED);

    /// Build a handle from its raw value
    ///
    /// Forged handles are harmless: lookups of handles the collector never
    /// minted fail with `UntrackedObject`.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw handle value
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Whether the collector has minted this handle
    #[inline]
    pub const fn is_assigned(self) -> bool {
        self.0 != UNASSIGNED
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// HandleAllocator - mints monotonically increasing handles
#[derive(Debug)]
pub(crate) struct HandleAllocator {
    next: u64,
}

impl HandleAllocator {
    pub(crate) fn new() -> Self {
        Self {
            next: UNASSIGNED + 1,
        }
    }

    /// Mint a fresh handle
    pub(crate) fn next(&mut self) -> ObjectHandle {
        let handle = ObjectHandle(self.next);
        self.next += 1;
        handle
    }

    /// Whether `handle` was minted by this allocator
    pub(crate) fn has_minted(&self, handle: ObjectHandle) -> bool {
        handle.is_assigned() && handle.0 < self.next
    }
}
