//! Stop-the-World Session Tests - Phase Ordering
//!
//! The step-wise phases must refuse every ordering that could destroy live
//! objects: sweep without mark, double sweep, and sweep after mutation.

mod common;

use common::{assert_idle, assert_no_marks, GcFixture};
use msgc::{GcError, GcState};

#[test]
fn test_sweep_without_mark_is_rejected() {
    let fixture = GcFixture::graph(3, &[(0, 1)], &[0]);

    {
        let mut session = fixture.gc.stop_the_world();
        assert!(matches!(session.sweep(), Err(GcError::SweepWithoutMark)));
    }

    // nothing was destroyed, not even the unreachable node
    assert_eq!(fixture.alive(), vec![0, 1, 2]);
    assert_eq!(fixture.gc.cycle_count(), 0);
}

#[test]
fn test_double_sweep_is_rejected() {
    let fixture = GcFixture::graph(3, &[(0, 1)], &[0]);
    let mut session = fixture.gc.stop_the_world();

    session.mark_all();
    let first = session.sweep().expect("sweep after mark should succeed");
    assert_eq!(first.objects_collected, 1);

    let second = session.sweep();
    assert!(matches!(second, Err(GcError::SweepWithoutMark)));
    assert_eq!(session.object_count(), 2);
}

#[test]
fn test_mutation_between_mark_and_sweep_is_rejected() {
    let fixture = GcFixture::graph(2, &[], &[0]);
    let mut session = fixture.gc.stop_the_world();

    session.mark_all();
    let late = session.track_allocation(99);
    session
        .add_reference(fixture.node(0), late)
        .expect("edge between tracked objects");

    match session.sweep() {
        Err(GcError::StaleMark {
            marked_epoch,
            current_epoch,
        }) => assert!(current_epoch > marked_epoch),
        other => panic!("expected StaleMark, got {:?}", other),
    }

    // a fresh mark sees the new edge
    session.mark_all();
    let stats = session.sweep().expect("sweep after re-mark should succeed");
    assert_eq!(stats.objects_collected, 1);
    assert!(session.is_tracked(late));
    assert!(!session.is_tracked(fixture.node(1)));
}

#[test]
fn test_root_removal_between_mark_and_sweep_is_rejected() {
    let fixture = GcFixture::graph(1, &[], &[0]);
    let mut session = fixture.gc.stop_the_world();

    session.mark_all();
    assert!(session.remove_root(fixture.node(0)));
    assert!(matches!(session.sweep(), Err(GcError::StaleMark { .. })));
}

#[test]
fn test_noop_mutation_keeps_mark_valid() {
    let fixture = GcFixture::graph(2, &[], &[0]);
    let mut session = fixture.gc.stop_the_world();

    session.mark_all();
    assert!(!session.add_root(fixture.node(0)).unwrap());
    assert!(!session.remove_root(fixture.node(1)));
    assert!(!session
        .remove_reference(fixture.node(0), fixture.node(1))
        .unwrap());

    assert!(session.sweep().is_ok());
}

#[test]
fn test_session_phases_match_collect() {
    let edges = [(0, 1), (1, 2), (3, 4), (4, 3)];
    let stepwise = GcFixture::graph(5, &edges, &[0]);
    let fused = GcFixture::graph(5, &edges, &[0]);

    let (mark, sweep) = {
        let mut session = stepwise.gc.stop_the_world();
        let mark = session.mark_all();
        assert_eq!(session.state(), GcState::Marked);
        for node in 0..3 {
            assert!(session.is_marked(stepwise.node(node)).unwrap());
        }
        assert!(!session.is_marked(stepwise.node(3)).unwrap());
        (mark, session.sweep().unwrap())
    };
    let report = fused.collect();

    assert_eq!(mark.objects_marked, report.mark.objects_marked);
    assert_eq!(sweep.objects_collected, report.sweep.objects_collected);
    assert_eq!(stepwise.alive(), fused.alive());
    assert_eq!(stepwise.gc.cycle_count(), 1);
    assert_no_marks(&stepwise, "stepwise");
    assert_idle(&stepwise, "stepwise");
}

#[test]
fn test_remark_replaces_previous_mark() {
    let fixture = GcFixture::graph(3, &[(0, 1), (1, 2)], &[0]);
    let mut session = fixture.gc.stop_the_world();

    session.mark_all();
    let second = session.mark_all();

    assert_eq!(second.objects_marked, 3);
    assert_eq!(second.already_marked, 0);
    assert_eq!(session.sweep().unwrap().survivors, 3);
}

#[test]
fn test_abandoned_session_leaves_no_marks() {
    let fixture = GcFixture::graph(3, &[(0, 1)], &[0]);

    {
        let mut session = fixture.gc.stop_the_world();
        session.mark_all();
        assert_eq!(session.state(), GcState::Marked);
    }

    assert_no_marks(&fixture, "abandoned session");
    assert_idle(&fixture, "abandoned session");
    assert_eq!(fixture.gc.diagnostics()["pending_mark"], "false");

    let report = fixture.collect();
    assert_eq!(report.survivors(), 2);
    assert_eq!(report.cycle, 1);
}

#[test]
fn test_session_cycle_diagnosis_keeps_marks() {
    let fixture = GcFixture::graph(4, &[(0, 1), (1, 0), (2, 3), (3, 2)], &[0]);
    let mut session = fixture.gc.stop_the_world();

    session.mark_all();
    let report = session.handle_circular_references();
    assert_eq!(report.cycles.len(), 2);
    assert_eq!(report.unreachable, vec![fixture.node(2), fixture.node(3)]);

    assert_eq!(session.state(), GcState::Marked);
    assert!(session.is_marked(fixture.node(0)).unwrap());
    assert!(!session.is_marked(fixture.node(2)).unwrap());
    assert_eq!(session.sweep().unwrap().objects_collected, 2);
}
