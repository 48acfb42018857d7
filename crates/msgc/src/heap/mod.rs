//! Heap Module - Arena of Managed Objects
//!
//! Every tracked object lives in one slot of a contiguous arena and is named
//! by a stable handle. The handle table maps handles to slots.
//!
//! ```text
//! handle table                 slots
//! ┌──────┬──────┐     ┌────┬────┬────┬────┬────┐
//! │  #1  │  0   │────▶│ #1 │ -- │ #4 │ #3 │ -- │
//! │  #3  │  3   │     └────┴────┴────┴────┴────┘
//! │  #4  │  2   │        0    1    2    3    4
//! └──────┴──────┘
//! ```
//!
//! New objects are appended at the end of the arena; destroyed and released
//! objects leave empty slots behind. Compaction slides objects into the holes
//! and rebinds their handles, so nothing outside the arena observes the move.

pub mod handle_table;

pub use handle_table::HandleTable;

use crate::error::{GcError, Result};
use crate::object::{ManagedObject, ObjectHandle};
use serde::Serialize;

/// Heap - arena owning every tracked object
#[derive(Debug)]
pub struct Heap<T> {
    /// Object slots, `None` for holes
    slots: Vec<Option<ManagedObject<T>>>,

    /// Handle -> slot mapping
    table: HandleTable,

    /// Objects ever placed in the arena
    total_tracked: u64,
}

impl<T> Heap<T> {
    /// Create arena with `capacity` reserved slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            table: HandleTable::with_capacity(capacity),
            total_tracked: 0,
        }
    }

    /// Place a new object in the arena
    pub fn insert(&mut self, data: T) -> ObjectHandle {
        let handle = self.table.mint();
        self.place(ManagedObject::with_handle(handle, data));
        handle
    }

    /// Place an existing object in the arena
    ///
    /// - unassigned handle: a fresh handle is minted
    /// - released handle: the object comes back under its old handle
    /// - tracked handle: `AlreadyTracked`
    /// - any other handle: `UntrackedObject`, the handle is not ours
    pub fn insert_object(&mut self, mut object: ManagedObject<T>) -> Result<ObjectHandle> {
        let handle = object.handle();

        if !handle.is_assigned() {
            let handle = self.table.mint();
            object.assign_handle(handle);
        } else if self.table.contains(handle) {
            return Err(GcError::AlreadyTracked { handle });
        } else if !self.table.is_released(handle) {
            return Err(GcError::UntrackedObject { handle });
        }

        object.set_marked(false);
        let handle = object.handle();
        self.place(object);
        Ok(handle)
    }

    fn place(&mut self, object: ManagedObject<T>) {
        let slot = self.slots.len();
        self.table.bind(object.handle(), slot);
        self.slots.push(Some(object));
        self.total_tracked += 1;
    }

    /// Hand an object back to the caller without destroying it
    pub fn release(&mut self, handle: ObjectHandle) -> Result<ManagedObject<T>> {
        let slot = self.table.resolve(handle)?;
        let object = self.slots[slot].take().ok_or_else(|| empty_slot(handle, slot))?;
        self.table.release(handle);
        Ok(object)
    }

    /// Drop the released-set entry of an object the caller will not restore
    pub fn forget(&mut self, handle: ObjectHandle) -> bool {
        self.table.forget(handle)
    }

    /// Handles currently held by callers after `release`
    pub fn released_count(&self) -> usize {
        self.table.released_len()
    }

    /// Remove the object in `slot` from the arena for destruction
    pub(crate) fn take_slot(&mut self, slot: usize) -> Option<ManagedObject<T>> {
        let object = self.slots.get_mut(slot)?.take()?;
        self.table.unbind(object.handle());
        Some(object)
    }

    /// Object for a tracked handle
    pub fn get(&self, handle: ObjectHandle) -> Result<&ManagedObject<T>> {
        let slot = self.table.resolve(handle)?;
        self.slots[slot]
            .as_ref()
            .ok_or_else(|| empty_slot(handle, slot))
    }

    /// Mutable object for a tracked handle
    pub fn get_mut(&mut self, handle: ObjectHandle) -> Result<&mut ManagedObject<T>> {
        let slot = self.table.resolve(handle)?;
        self.slots[slot]
            .as_mut()
            .ok_or_else(|| empty_slot(handle, slot))
    }

    /// Object for a tracked handle, `None` otherwise
    #[inline]
    pub fn lookup(&self, handle: ObjectHandle) -> Option<&ManagedObject<T>> {
        let slot = self.table.slot(handle)?;
        self.slots.get(slot)?.as_ref()
    }

    #[inline]
    pub(crate) fn lookup_mut(&mut self, handle: ObjectHandle) -> Option<&mut ManagedObject<T>> {
        let slot = self.table.slot(handle)?;
        self.slots.get_mut(slot)?.as_mut()
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, slot: usize) -> Option<&mut ManagedObject<T>> {
        self.slots.get_mut(slot)?.as_mut()
    }

    /// Whether `handle` is tracked
    #[inline]
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.table.contains(handle)
    }

    /// Error describing why `handle` is not tracked
    pub fn missing(&self, handle: ObjectHandle) -> GcError {
        self.table.missing(handle)
    }

    /// Tracked objects in slot order
    pub fn iter(&self) -> impl Iterator<Item = &ManagedObject<T>> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    /// Tracked handles in slot order
    pub fn handles(&self) -> Vec<ObjectHandle> {
        self.iter().map(|obj| obj.handle()).collect()
    }

    /// Number of tracked objects
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of slots, including holes
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slot index of a tracked handle
    #[inline]
    pub fn slot_of(&self, handle: ObjectHandle) -> Option<usize> {
        self.table.slot(handle)
    }

    /// Move the object in `from` into the empty slot `to`
    ///
    /// Rebinds the handle; edges and roots are unaffected.
    pub(crate) fn move_slot(&mut self, from: usize, to: usize) -> Result<()> {
        if self.slots.get(to).map_or(true, |slot| slot.is_some()) {
            return Err(GcError::Internal(format!(
                "relocation target slot {} is not a hole",
                to
            )));
        }

        let object = self
            .slots
            .get_mut(from)
            .and_then(|slot| slot.take())
            .ok_or_else(|| GcError::Internal(format!("relocation source slot {} is empty", from)))?;

        self.table.bind(object.handle(), to);
        self.slots[to] = Some(object);
        Ok(())
    }

    /// Clear every mark bit, returns how many were set
    pub(crate) fn clear_marks(&mut self) -> usize {
        let mut cleared = 0;
        for object in self.slots.iter_mut().filter_map(|slot| slot.as_mut()) {
            if object.is_marked() {
                object.set_marked(false);
                cleared += 1;
            }
        }
        cleared
    }

    /// Drop trailing holes, returns the number of slots reclaimed
    pub(crate) fn truncate_free_tail(&mut self) -> usize {
        let before = self.slots.len();
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        before - self.slots.len()
    }

    /// Get heap statistics
    pub fn get_stats(&self) -> HeapStats {
        let slot_count = self.slots.len();
        let live = self.len();
        let free_slots = slot_count - live;

        HeapStats {
            live_objects: live,
            slot_count,
            free_slots,
            capacity: self.slots.capacity(),
            fragmentation: if slot_count == 0 {
                0.0
            } else {
                free_slots as f64 / slot_count as f64
            },
            total_tracked: self.total_tracked,
        }
    }
}

fn empty_slot(handle: ObjectHandle, slot: usize) -> GcError {
    GcError::Internal(format!("handle {} is bound to empty slot {}", handle, slot))
}

/// Heap statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeapStats {
    /// Tracked objects
    pub live_objects: usize,
    /// Arena slots including holes
    pub slot_count: usize,
    /// Holes left by sweep and release
    pub free_slots: usize,
    /// Reserved slot capacity
    pub capacity: usize,
    /// free_slots / slot_count (0.0 - 1.0)
    pub fragmentation: f64,
    /// Objects ever placed in the arena
    pub total_tracked: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut heap = Heap::with_capacity(4);
        let a = heap.insert("a");
        let b = heap.insert("b");
        assert_eq!(*heap.get(a).unwrap().data(), "a");
        assert_eq!(*heap.get(b).unwrap().data(), "b");
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.handles(), vec![a, b]);
    }

    #[test]
    fn test_release_and_restore_keeps_handle() {
        let mut heap = Heap::with_capacity(4);
        let a = heap.insert(1u32);
        let obj = heap.release(a).unwrap();
        assert!(!heap.contains(a));
        assert_eq!(heap.get_stats().free_slots, 1);

        let restored = heap.insert_object(obj).unwrap();
        assert_eq!(restored, a);
        assert!(heap.contains(a));
    }

    #[test]
    fn test_insert_object_rejects_tracked_and_foreign_handles() {
        let mut heap = Heap::with_capacity(4);
        let a = heap.insert(());

        let duplicate = ManagedObject::with_handle(a, ());
        assert!(matches!(
            heap.insert_object(duplicate),
            Err(GcError::AlreadyTracked { .. })
        ));

        let foreign = ManagedObject::with_handle(ObjectHandle::from_raw(500), ());
        assert!(matches!(
            heap.insert_object(foreign),
            Err(GcError::UntrackedObject { .. })
        ));

        let fresh = heap.insert_object(ManagedObject::new(())).unwrap();
        assert_ne!(fresh, a);
    }

    #[test]
    fn test_take_slot_makes_handle_stale() {
        let mut heap = Heap::with_capacity(4);
        let a = heap.insert(());
        let slot = heap.slot_of(a).unwrap();
        assert!(heap.take_slot(slot).is_some());
        assert!(heap.take_slot(slot).is_none());
        assert!(matches!(heap.get(a), Err(GcError::StaleHandle { .. })));
    }

    #[test]
    fn test_move_slot_rebinds_handle() {
        let mut heap = Heap::with_capacity(4);
        let a = heap.insert('a');
        let b = heap.insert('b');
        heap.release(a).unwrap();

        heap.move_slot(1, 0).unwrap();
        assert_eq!(heap.slot_of(b), Some(0));
        assert_eq!(*heap.get(b).unwrap().data(), 'b');
        assert_eq!(heap.truncate_free_tail(), 1);
        assert_eq!(heap.slot_count(), 1);
    }

    #[test]
    fn test_move_slot_refuses_occupied_target() {
        let mut heap = Heap::with_capacity(4);
        heap.insert(1);
        heap.insert(2);
        assert!(matches!(heap.move_slot(1, 0), Err(GcError::Internal(_))));
    }

    #[test]
    fn test_stats_fragmentation() {
        let mut heap = Heap::with_capacity(4);
        let handles: Vec<_> = (0..4).map(|i| heap.insert(i)).collect();
        heap.release(handles[1]).unwrap();
        let stats = heap.get_stats();
        assert_eq!(stats.live_objects, 3);
        assert_eq!(stats.free_slots, 1);
        assert!((stats.fragmentation - 0.25).abs() < f64::EPSILON);
    }
}
