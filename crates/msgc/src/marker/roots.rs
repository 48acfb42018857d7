//! Root Set - Marking Starting Points
//!
//! Roots are the objects assumed alive a priori. Every object reachable from
//! a root must survive the cycle.
//!
//! Roots are non-owning: a root is a handle plus bookkeeping. The collector
//! only admits tracked handles into the set and refuses to release a rooted
//! object, so a root can never name an object the arena no longer owns.
//! `purge` exists for sweep's last-line check and counts every entry it
//! removes.

use crate::object::ObjectHandle;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Root descriptor - describes a single root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDescriptor {
    /// Rooted object
    pub handle: ObjectHandle,
    /// Optional name for debugging
    pub name: Option<String>,
    /// Registration order, unique for the life of the set
    pub root_id: usize,
}

impl RootDescriptor {
    pub fn new(handle: ObjectHandle, name: Option<&str>, root_id: usize) -> Self {
        Self {
            handle,
            name: name.map(|s| s.to_string()),
            root_id,
        }
    }
}

impl fmt::Display for RootDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", self.handle, name),
            None => write!(f, "{}", self.handle),
        }
    }
}

/// Root statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RootStats {
    /// Roots currently registered
    pub live_roots: usize,
    /// Roots ever registered
    pub total_registered: usize,
    /// Roots removed by callers
    pub removed: usize,
    /// Roots removed by sweep because their object was destroyed
    pub purged: usize,
}

impl fmt::Display for RootStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RootStats {{ live: {}, registered: {}, removed: {}, purged: {} }}",
            self.live_roots, self.total_registered, self.removed, self.purged
        )
    }
}

/// RootSet - ordered set of roots
#[derive(Debug, Default)]
pub struct RootSet {
    roots: IndexMap<ObjectHandle, RootDescriptor>,
    next_root_id: usize,
    removed: usize,
    purged: usize,
}

impl RootSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root
    ///
    /// Returns `false` if `handle` was already a root; the existing
    /// descriptor is kept.
    pub fn add(&mut self, handle: ObjectHandle, name: Option<&str>) -> bool {
        if self.roots.contains_key(&handle) {
            return false;
        }

        let descriptor = RootDescriptor::new(handle, name, self.next_root_id);
        self.next_root_id += 1;
        self.roots.insert(handle, descriptor);
        true
    }

    /// Unregister a root, returns whether it was registered
    pub fn remove(&mut self, handle: ObjectHandle) -> bool {
        let removed = self.roots.shift_remove(&handle).is_some();
        if removed {
            self.removed += 1;
        }
        removed
    }

    /// Remove a root whose object is being destroyed
    pub fn purge(&mut self, handle: ObjectHandle) -> Option<RootDescriptor> {
        let purged = self.roots.shift_remove(&handle);
        if purged.is_some() {
            self.purged += 1;
        }
        purged
    }

    #[inline]
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.roots.contains_key(&handle)
    }

    pub fn get(&self, handle: ObjectHandle) -> Option<&RootDescriptor> {
        self.roots.get(&handle)
    }

    /// Rooted handles in registration order
    pub fn handles(&self) -> Vec<ObjectHandle> {
        self.roots.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RootDescriptor> {
        self.roots.values()
    }

    /// Diagnostic name of a root, if it was registered with one
    pub fn name(&self, handle: ObjectHandle) -> Option<&str> {
        self.roots.get(&handle).and_then(|root| root.name.as_deref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Get statistics
    pub fn get_stats(&self) -> RootStats {
        RootStats {
            live_roots: self.roots.len(),
            total_registered: self.next_root_id,
            removed: self.removed,
            purged: self.purged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut roots = RootSet::new();
        let h = ObjectHandle::from_raw(1);
        assert!(roots.add(h, Some("main")));
        assert!(!roots.add(h, Some("other")));
        assert_eq!(roots.len(), 1);
        assert_eq!(roots.get(h).and_then(|d| d.name.as_deref()), Some("main"));
    }

    #[test]
    fn test_remove_and_purge_are_counted_separately() {
        let mut roots = RootSet::new();
        let a = ObjectHandle::from_raw(1);
        let b = ObjectHandle::from_raw(2);
        roots.add(a, None);
        roots.add(b, None);

        assert!(roots.remove(a));
        assert!(!roots.remove(a));
        assert_eq!(roots.purge(b).map(|root| root.handle), Some(b));
        assert!(roots.purge(b).is_none());

        let stats = roots.get_stats();
        assert_eq!(stats.live_roots, 0);
        assert_eq!(stats.total_registered, 2);
        assert_eq!(stats.removed, 1);
        assert_eq!(stats.purged, 1);
    }

    #[test]
    fn test_descriptor_display_includes_name() {
        let mut roots = RootSet::new();
        let named = ObjectHandle::from_raw(3);
        let plain = ObjectHandle::from_raw(4);
        roots.add(named, Some("globals"));
        roots.add(plain, None);

        assert_eq!(roots.name(named), Some("globals"));
        assert_eq!(roots.name(plain), None);
        let rendered: Vec<String> = roots.iter().map(|root| root.to_string()).collect();
        assert_eq!(rendered, vec!["#3 (globals)", "#4"]);
    }

    #[test]
    fn test_registration_order_is_kept() {
        let mut roots = RootSet::new();
        let handles: Vec<_> = (1..=4).map(ObjectHandle::from_raw).collect();
        for &h in handles.iter().rev() {
            roots.add(h, None);
        }
        roots.remove(handles[2]);
        assert_eq!(
            roots.handles(),
            vec![handles[3], handles[1], handles[0]]
        );
    }
}
