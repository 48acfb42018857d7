//! Mark Queue - Work Queue for Marking
//!
//! Holds handles that have been marked but whose edges have not been traced
//! yet. Marking runs with the collector lock held, so the queue is a plain
//! FIFO owned by the marker; FIFO order makes the traversal breadth-first.
//!
//! A handle enters the queue at most once per mark phase: it is pushed only
//! on its false -> true mark transition.

use crate::object::ObjectHandle;
use std::collections::VecDeque;

/// MarkQueue - pending marking work
#[derive(Debug, Default)]
pub struct MarkQueue {
    queue: VecDeque<ObjectHandle>,
    enqueued_count: usize,
    processed_count: usize,
}

impl MarkQueue {
    /// Create new mark queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create mark queue with room for `capacity` handles
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Push a freshly marked object
    pub fn push(&mut self, object: ObjectHandle) {
        self.queue.push_back(object);
        self.enqueued_count += 1;
    }

    /// Pop the next object to trace
    pub fn pop(&mut self) -> Option<ObjectHandle> {
        let object = self.queue.pop_front();
        if object.is_some() {
            self.processed_count += 1;
        }
        object
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Clear pending work and counters
    pub fn reset(&mut self) {
        self.queue.clear();
        self.enqueued_count = 0;
        self.processed_count = 0;
    }

    pub fn enqueued_count(&self) -> usize {
        self.enqueued_count
    }

    pub fn processed_count(&self) -> usize {
        self.processed_count
    }

    /// Get statistics
    pub fn stats(&self) -> MarkQueueStats {
        MarkQueueStats {
            enqueued: self.enqueued_count,
            processed: self.processed_count,
            pending: self.queue.len(),
        }
    }
}

/// Statistics for mark queue
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MarkQueueStats {
    /// Total enqueued objects
    pub enqueued: usize,
    /// Total processed objects
    pub processed: usize,
    /// Pending objects in queue
    pub pending: usize,
}
