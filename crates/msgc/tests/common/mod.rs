//! Test Utilities for the msgc Test Suite
//!
//! Fixtures build object graphs from edge lists; the assertion helpers check
//! the collector against an independent reachability computation.

#![allow(dead_code)]

use msgc::{CollectionReport, GarbageCollector, GcConfig, GcState, ObjectHandle};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// Maximum test duration before timeout
pub const TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// ============================================================================
/// GC FIXTURE
/// ============================================================================

/// Test fixture for collector operations
///
/// Payloads are the node index the object was created for, so destroyed and
/// surviving objects can be named in assertions.
pub struct GcFixture {
    pub gc: Arc<GarbageCollector<usize>>,
    pub config: GcConfig,
    pub nodes: Vec<ObjectHandle>,
}

impl GcFixture {
    /// Create fixture with default configuration
    pub fn with_defaults() -> Self {
        Self::with_config(GcConfig::default())
    }

    /// Create fixture with custom configuration
    pub fn with_config(config: GcConfig) -> Self {
        let gc = Arc::new(
            GarbageCollector::new(config.clone())
                .expect("collector initialization should succeed with valid config"),
        );

        Self {
            gc,
            config,
            nodes: Vec::new(),
        }
    }

    /// Create `count` objects, payload = node index
    pub fn with_nodes(count: usize) -> Self {
        let mut fixture = Self::with_defaults();
        fixture.add_nodes(count);
        fixture
    }

    /// Create a graph from an edge list over `count` nodes
    pub fn graph(count: usize, edges: &[(usize, usize)], roots: &[usize]) -> Self {
        let mut fixture = Self::with_nodes(count);
        fixture.link_all(edges);
        for &root in roots {
            fixture.root(root);
        }
        fixture
    }

    pub fn add_nodes(&mut self, count: usize) {
        for _ in 0..count {
            let index = self.nodes.len();
            self.nodes.push(self.gc.track_allocation(index));
        }
    }

    pub fn node(&self, index: usize) -> ObjectHandle {
        self.nodes[index]
    }

    pub fn link(&self, from: usize, to: usize) {
        self.gc
            .add_reference(self.nodes[from], self.nodes[to])
            .unwrap_or_else(|e| panic!("edge {} -> {} rejected: {}", from, to, e));
    }

    pub fn link_all(&self, edges: &[(usize, usize)]) {
        for &(from, to) in edges {
            self.link(from, to);
        }
    }

    pub fn root(&self, index: usize) {
        self.gc
            .add_root(self.nodes[index])
            .unwrap_or_else(|e| panic!("root {} rejected: {}", index, e));
    }

    pub fn unroot(&self, index: usize) -> bool {
        self.gc.remove_root(self.nodes[index])
    }

    /// Run a collection and expect it to succeed
    pub fn collect(&self) -> CollectionReport {
        self.gc.collect().expect("collection should succeed")
    }

    pub fn is_alive(&self, index: usize) -> bool {
        self.gc.is_tracked(self.nodes[index])
    }

    /// Indices of nodes still tracked, ascending
    pub fn alive(&self) -> Vec<usize> {
        (0..self.nodes.len()).filter(|&i| self.is_alive(i)).collect()
    }

    pub fn times_marked(&self, index: usize) -> u64 {
        self.gc
            .with_object(self.nodes[index], |object| object.times_marked())
            .unwrap_or_else(|e| panic!("node {} not tracked: {}", index, e))
    }
}

/// ============================================================================
/// REACHABILITY ORACLE
/// ============================================================================

/// Node indices reachable from `roots` over `edges`, computed independently
/// of the collector
pub fn reachable_from(count: usize, edges: &[(usize, usize)], roots: &[usize]) -> HashSet<usize> {
    let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();
    for &(from, to) in edges {
        adjacency.entry(from).or_default().push(to);
    }

    let mut seen = HashSet::new();
    let mut queue: VecDeque<usize> = roots.iter().copied().filter(|&r| r < count).collect();
    while let Some(node) = queue.pop_front() {
        if !seen.insert(node) {
            continue;
        }
        if let Some(targets) = adjacency.get(&node) {
            queue.extend(targets.iter().copied());
        }
    }
    seen
}

/// ============================================================================
/// STRICT ASSERTION HELPERS
/// ============================================================================

/// Assert that exactly the oracle's reachable set survived
///
/// Soundness: nothing reachable was destroyed. Completeness: nothing
/// unreachable survived.
#[track_caller]
pub fn assert_survivors_match(fixture: &GcFixture, expected: &HashSet<usize>, context: &str) {
    for index in 0..fixture.nodes.len() {
        let alive = fixture.is_alive(index);
        let reachable = expected.contains(&index);
        assert!(
            !(reachable && !alive),
            "{}: reachable node {} was destroyed (soundness)",
            context,
            index
        );
        assert!(
            !(!reachable && alive),
            "{}: unreachable node {} survived (completeness)",
            context,
            index
        );
    }
}

/// Assert that the collector is back at rest
#[track_caller]
pub fn assert_idle(fixture: &GcFixture, context: &str) {
    assert_eq!(
        fixture.gc.state(),
        GcState::Idle,
        "{}: collector state is {:?}, expected Idle",
        context,
        fixture.gc.state()
    );
}

/// Assert that no surviving object is left marked
#[track_caller]
pub fn assert_no_marks(fixture: &GcFixture, context: &str) {
    for handle in fixture.gc.handles() {
        let marked = fixture
            .gc
            .with_object(handle, |object| object.is_marked())
            .expect("listed handle should be tracked");
        assert!(!marked, "{}: {} still marked after sweep", context, handle);
    }
}
