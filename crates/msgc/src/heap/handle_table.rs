//! Handle Table - Handle to slot mapping
//!
//! The table is the single source of truth for tracked-set membership: an
//! object is tracked if and only if its handle has a table entry. Sweep and
//! release both go through the table, so an object can never be destroyed
//! twice.
//!
//! Handles that leave the table are classified:
//! - released: handed back to the caller by `remove_allocation`, may return
//! - collected: destroyed by a sweep, stale forever
//!
//! A released handle stays in the released set until it is restored or
//! forgotten. Callers that drop a removed object should forget its handle,
//! otherwise the entry is held for the collector's lifetime.

use crate::error::{GcError, Result};
use crate::object::handle::HandleAllocator;
use crate::object::ObjectHandle;
use indexmap::{IndexMap, IndexSet};

/// HandleTable - maps live handles to arena slots
#[derive(Debug)]
pub struct HandleTable {
    /// Tracked handles: handle -> slot index
    entries: IndexMap<ObjectHandle, usize>,

    /// Handles currently owned by callers after `remove_allocation`
    released: IndexSet<ObjectHandle>,

    /// Handle source
    allocator: HandleAllocator,
}

impl HandleTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
            released: IndexSet::new(),
            allocator: HandleAllocator::new(),
        }
    }

    /// Mint a handle for a new object
    pub fn mint(&mut self) -> ObjectHandle {
        self.allocator.next()
    }

    /// Bind a handle to a slot
    pub fn bind(&mut self, handle: ObjectHandle, slot: usize) {
        self.released.shift_remove(&handle);
        self.entries.insert(handle, slot);
    }

    /// Drop the entry for a destroyed object
    pub fn unbind(&mut self, handle: ObjectHandle) -> Option<usize> {
        self.entries.swap_remove(&handle)
    }

    /// Drop the entry for an object handed back to the caller
    pub fn release(&mut self, handle: ObjectHandle) -> Option<usize> {
        let slot = self.entries.swap_remove(&handle)?;
        self.released.insert(handle);
        Some(slot)
    }

    /// Give up on a released handle; it reads as stale from now on
    pub fn forget(&mut self, handle: ObjectHandle) -> bool {
        self.released.swap_remove(&handle)
    }

    /// Handles currently released to callers
    #[inline]
    pub fn released_len(&self) -> usize {
        self.released.len()
    }

    /// Slot for a tracked handle
    #[inline]
    pub fn slot(&self, handle: ObjectHandle) -> Option<usize> {
        self.entries.get(&handle).copied()
    }

    /// Slot for a tracked handle, or the reason it is not tracked
    pub fn resolve(&self, handle: ObjectHandle) -> Result<usize> {
        if let Some(slot) = self.slot(handle) {
            return Ok(slot);
        }

        Err(self.missing(handle))
    }

    /// Error describing why `handle` has no entry
    pub fn missing(&self, handle: ObjectHandle) -> GcError {
        if self.allocator.has_minted(handle) && !self.released.contains(&handle) {
            GcError::StaleHandle { handle }
        } else {
            GcError::UntrackedObject { handle }
        }
    }

    #[inline]
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Whether `handle` is currently released to a caller
    #[inline]
    pub fn is_released(&self, handle: ObjectHandle) -> bool {
        self.released.contains(&handle)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
