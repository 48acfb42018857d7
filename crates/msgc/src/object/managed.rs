//! Managed Object - Node of the reference graph
//!
//! Object Layout:
//! ┌─────────────────────────────────────────┐
//! │  handle        stable identity          │
//! │  marked        collection-scoped bit    │
//! │  references    outgoing edges (handles) │
//! │  times_marked  mark transition counter  │
//! │  data          client payload           │
//! └─────────────────────────────────────────┘
//!
//! Edges are non-owning: an object never owns what it references. The arena
//! owns every tracked object. Self-edges and duplicate edges are legal.
//!
//! The mark bit is collector state. It is only written through
//! `set_marked`, which is private to the crate, and it is `false` on every
//! surviving object between collection cycles.

use super::handle::ObjectHandle;

/// ManagedObject - a payload plus its outgoing edges
#[derive(Debug, Clone)]
pub struct ManagedObject<T> {
    handle: ObjectHandle,
    marked: bool,
    references: Vec<ObjectHandle>,
    times_marked: u64,
    data: T,
}

impl<T> ManagedObject<T> {
    /// Create an untracked object
    ///
    /// The handle stays unassigned until the collector tracks the object.
    pub fn new(data: T) -> Self {
        Self {
            handle: ObjectHandle::UNASSIGNED,
            marked: false,
            references: Vec::new(),
            times_marked: 0,
            data,
        }
    }

    pub(crate) fn with_handle(handle: ObjectHandle, data: T) -> Self {
        let mut object = Self::new(data);
        object.handle = handle;
        object
    }

    /// Object identity
    #[inline]
    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    /// Append an edge to `other`
    ///
    /// No ownership transfer and no cycle check. Tracked objects are only
    /// handed out by shared reference, so edges on tracked objects are added
    /// through `GarbageCollector::add_reference`.
    pub fn add_reference(&mut self, other: ObjectHandle) {
        self.references.push(other);
    }

    /// Remove the first edge to `other`
    ///
    /// Returns whether an edge was removed.
    pub fn remove_reference(&mut self, other: ObjectHandle) -> bool {
        match self.references.iter().position(|&h| h == other) {
            Some(pos) => {
                self.references.remove(pos);
                true
            },
            None => false,
        }
    }

    /// Outgoing edges in insertion order
    #[inline]
    pub fn references(&self) -> &[ObjectHandle] {
        &self.references
    }

    /// Whether the current mark phase reached this object
    #[inline]
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Set the mark bit
    ///
    /// Counts false -> true transitions in `times_marked`.
    #[inline]
    pub(crate) fn set_marked(&mut self, marked: bool) {
        if marked && !self.marked {
            self.times_marked += 1;
        }
        self.marked = marked;
    }

    /// Number of times a mark phase has reached this object
    #[inline]
    pub fn times_marked(&self) -> u64 {
        self.times_marked
    }

    /// Client payload
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Mutable client payload
    #[inline]
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Consume the object, returning its payload
    pub fn into_inner(self) -> T {
        self.data
    }

    pub(crate) fn assign_handle(&mut self, handle: ObjectHandle) {
        self.handle = handle;
    }
}
