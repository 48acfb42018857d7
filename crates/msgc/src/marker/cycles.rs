//! Cycle Detection - Diagnostic DFS over the reference graph
//!
//! A depth-first walk keeps the current path on a recursion stack; an edge
//! to a node that is on the stack is a back edge and closes a cycle made of
//! the stack suffix starting at that node.
//!
//! Cycle detection is diagnostic only. It reads the graph, never the mark
//! bits, and never decides liveness: an unreachable cycle is ordinary
//! garbage and the normal sweep destroys it. The report exists for leak
//! reporting.
//!
//! Back edges only name the cycles a single DFS closes. Membership in the
//! report comes from strongly connected components instead: an object is
//! cyclic when its component has more than one member or it refers to
//! itself, no matter which node the walk entered first.
//!
//! Both walks use an explicit frame stack, so long chains cannot overflow
//! the thread stack.

use crate::heap::Heap;
use crate::object::ObjectHandle;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Result of a full-graph cycle scan
#[derive(Debug, Default, Clone, Serialize)]
pub struct CycleReport {
    /// One cycle per distinct back edge, members in path order starting at
    /// the smallest handle
    pub cycles: Vec<Vec<ObjectHandle>>,
    /// Cyclic strongly connected components, members in handle order
    pub components: Vec<Vec<ObjectHandle>>,
    /// Every object on at least one cycle, in handle order
    pub cyclic_objects: Vec<ObjectHandle>,
    /// Cyclic objects not reachable from any root; the next collection
    /// destroys them
    pub unreachable: Vec<ObjectHandle>,
}

impl CycleReport {
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    pub fn leaked_count(&self) -> usize {
        self.unreachable.len()
    }
}

/// CycleDetector - collects cycles found by DFS
#[derive(Debug, Default)]
pub struct CycleDetector {
    cycles: IndexSet<Vec<ObjectHandle>>,
}

impl CycleDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the graph from `start`, returns whether a cycle was found
    ///
    /// `visited` carries finished and in-progress nodes across calls so a
    /// full scan visits each object once; `on_stack` is the current DFS path
    /// and is empty again when the call returns. A node already in `visited`
    /// is not walked again. Edges to untracked handles are ignored.
    pub fn detect_cycle<T>(
        &mut self,
        heap: &Heap<T>,
        start: ObjectHandle,
        visited: &mut IndexSet<ObjectHandle>,
        on_stack: &mut IndexSet<ObjectHandle>,
    ) -> bool {
        if !heap.contains(start) || visited.contains(&start) {
            return false;
        }

        let mut found = false;
        // (node, next edge index)
        let mut frames: Vec<(ObjectHandle, usize)> = vec![(start, 0)];
        visited.insert(start);
        on_stack.insert(start);

        while let Some(top) = frames.len().checked_sub(1) {
            let (node, edge_index) = frames[top];
            let edge = heap
                .lookup(node)
                .and_then(|object| object.references().get(edge_index).copied());

            let Some(target) = edge else {
                frames.pop();
                on_stack.pop();
                continue;
            };
            frames[top].1 += 1;

            if let Some(pos) = on_stack.get_index_of(&target) {
                found = true;
                let members: Vec<ObjectHandle> = on_stack.iter().skip(pos).copied().collect();
                self.record(members);
            } else if heap.contains(target) && visited.insert(target) {
                on_stack.insert(target);
                frames.push((target, 0));
            }
        }

        found
    }

    /// Run the detector from every tracked object
    pub fn scan<T>(&mut self, heap: &Heap<T>) -> usize {
        let mut visited = IndexSet::with_capacity(heap.len());
        let mut on_stack = IndexSet::new();
        for object in heap.iter() {
            self.detect_cycle(heap, object.handle(), &mut visited, &mut on_stack);
        }
        self.cycles.len()
    }

    /// Store a cycle rotated to start at its smallest handle
    fn record(&mut self, mut members: Vec<ObjectHandle>) {
        if let Some(min_pos) = members
            .iter()
            .enumerate()
            .min_by_key(|(_, handle)| **handle)
            .map(|(pos, _)| pos)
        {
            members.rotate_left(min_pos);
        }
        self.cycles.insert(members);
    }

    /// Cycles found so far
    pub fn cycles(&self) -> impl Iterator<Item = &Vec<ObjectHandle>> {
        self.cycles.iter()
    }

    /// Build a report; `reachable` is the root-reachable set
    pub fn into_report<T>(self, heap: &Heap<T>, reachable: &IndexSet<ObjectHandle>) -> CycleReport {
        let components = cyclic_components(heap);

        let mut cyclic: Vec<ObjectHandle> = components.iter().flatten().copied().collect();
        cyclic.sort_unstable();

        let unreachable = cyclic
            .iter()
            .copied()
            .filter(|handle| !reachable.contains(handle))
            .collect();

        CycleReport {
            cycles: self.cycles.into_iter().collect(),
            components,
            cyclic_objects: cyclic,
            unreachable,
        }
    }
}

/// Tarjan state for one component scan
struct ComponentScan {
    index: IndexMap<ObjectHandle, usize>,
    lowlink: Vec<usize>,
    stack: IndexSet<ObjectHandle>,
    frames: Vec<(ObjectHandle, usize)>,
}

impl ComponentScan {
    fn visit(&mut self, handle: ObjectHandle) {
        let index = self.index.len();
        self.index.insert(handle, index);
        self.lowlink.push(index);
        self.stack.insert(handle);
        self.frames.push((handle, 0));
    }
}

/// Strongly connected components that contain a cycle
///
/// Iterative Tarjan over the tracked objects. A component qualifies when it
/// has more than one member or its single member has a self edge. Edges to
/// untracked handles are ignored. Components come out in discovery order,
/// members sorted by handle.
pub fn cyclic_components<T>(heap: &Heap<T>) -> Vec<Vec<ObjectHandle>> {
    let mut scan = ComponentScan {
        index: IndexMap::with_capacity(heap.len()),
        lowlink: Vec::with_capacity(heap.len()),
        stack: IndexSet::new(),
        frames: Vec::new(),
    };
    let mut components = Vec::new();

    for object in heap.iter() {
        if scan.index.contains_key(&object.handle()) {
            continue;
        }
        scan.visit(object.handle());

        while let Some(top) = scan.frames.len().checked_sub(1) {
            let (node, edge_index) = scan.frames[top];
            let node_index = scan.index[&node];
            let edge = heap
                .lookup(node)
                .and_then(|object| object.references().get(edge_index).copied());

            if let Some(target) = edge {
                scan.frames[top].1 += 1;
                if !heap.contains(target) {
                    continue;
                }
                match scan.index.get(&target).copied() {
                    None => scan.visit(target),
                    Some(target_index) if scan.stack.contains(&target) => {
                        scan.lowlink[node_index] = scan.lowlink[node_index].min(target_index);
                    },
                    Some(_) => {},
                }
                continue;
            }

            scan.frames.pop();
            let low = scan.lowlink[node_index];
            if let Some(&(parent, _)) = scan.frames.last() {
                let parent_index = scan.index[&parent];
                scan.lowlink[parent_index] = scan.lowlink[parent_index].min(low);
            }
            if low != node_index {
                continue;
            }

            let Some(pos) = scan.stack.get_index_of(&node) else {
                continue;
            };
            let mut members: Vec<ObjectHandle> = scan.stack.drain(pos..).collect();
            let self_loop = members.len() == 1
                && heap
                    .lookup(node)
                    .map_or(false, |object| object.references().contains(&node));
            if members.len() > 1 || self_loop {
                members.sort_unstable();
                components.push(members);
            }
        }
    }

    components
}
