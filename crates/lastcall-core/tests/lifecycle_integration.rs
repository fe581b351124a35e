//! End-to-end lifecycle scenarios driven with synthetic time.
//!
//! The engine takes every instant as a parameter, so these tests walk the
//! clock explicitly instead of sleeping.

use chrono::{DateTime, Duration, TimeZone, Utc};
use lastcall_core::urgency::classify;
use lastcall_core::{BurialCause, EngineSettings, Event, LifecycleEngine, Urgency};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn engine() -> LifecycleEngine {
    LifecycleEngine::new(EngineSettings::default())
}

fn create_at(
    engine: &mut LifecycleEngine,
    name: &str,
    duration: Duration,
    now: DateTime<Utc>,
) -> String {
    match engine.create(name, duration, now).unwrap() {
        Event::TaskCreated { task, .. } => task.id,
        other => panic!("expected TaskCreated, got {other:?}"),
    }
}

fn assert_disjoint(engine: &LifecycleEngine, now: DateTime<Utc>) {
    let snap = engine.snapshot(now);
    for task in &snap.tasks {
        assert!(
            !snap.graveyard.iter().any(|g| g.id == task.id),
            "id {} present in both stores",
            task.id
        );
    }
}

#[test]
fn twenty_minute_task_urgency_walk() {
    let deadline = t0() + Duration::minutes(20);
    assert_eq!(classify(deadline, t0()), Urgency::Elevated);
    assert_eq!(classify(deadline, t0() + Duration::minutes(5)), Urgency::Critical);
    assert_eq!(classify(deadline, t0() + Duration::minutes(19)), Urgency::Terminal);
    assert_eq!(classify(deadline, t0() + Duration::minutes(25)), Urgency::Terminal);
}

#[test]
fn expiration_migrates_through_the_settle_delay() {
    let mut engine = engine();
    let id = create_at(&mut engine, "report", Duration::seconds(100), t0());

    let lapse = t0() + Duration::seconds(100);
    let events = engine.tick(lapse);
    assert!(matches!(events.as_slice(), [Event::TaskExpiring { .. }]));
    // Still active during the settle window, flagged as expiring.
    let snap = engine.snapshot(lapse);
    assert_eq!(snap.tasks.len(), 1);
    assert!(snap.tasks[0].expiring);
    assert!(snap.graveyard.is_empty());

    let settled = lapse + Duration::milliseconds(300);
    let events = engine.tick(settled);
    match events.as_slice() {
        [Event::TaskBuried { entry, cause, .. }] => {
            assert_eq!(entry.id, id);
            assert_eq!(*cause, BurialCause::Expired);
            assert_eq!(entry.expired_at, settled);
        }
        other => panic!("expected a single TaskBuried, got {other:?}"),
    }
    assert!(engine.active().is_empty());
    assert!(engine.graveyard().contains(&id));
    assert_eq!(engine.counters().expired, 1);
    assert_eq!(engine.counters().streak, 0);
    assert_disjoint(&engine, settled);
}

#[test]
fn zero_duration_task_expires_on_the_first_tick() {
    let mut engine = engine();
    let id = create_at(&mut engine, "immediate", Duration::zero(), t0());
    assert!(matches!(
        engine.tick(t0()).as_slice(),
        [Event::TaskExpiring { .. }]
    ));
    engine.tick(t0() + Duration::milliseconds(300));
    assert!(engine.graveyard().contains(&id));
}

#[test]
fn retention_window_boundary() {
    let mut engine = engine();
    let id = create_at(&mut engine, "t", Duration::minutes(30), t0());
    engine.delete(&id, t0());

    let almost = t0() + Duration::hours(23) + Duration::minutes(59);
    assert!(engine.tick(almost).is_empty());
    assert!(engine.graveyard().contains(&id));

    let elapsed = t0() + Duration::hours(24) + Duration::seconds(1);
    let events = engine.tick(elapsed);
    assert!(matches!(events.as_slice(), [Event::GraveEvicted { .. }]));
    assert!(engine.graveyard().is_empty());
}

#[test]
fn eviction_fires_exactly_at_the_boundary() {
    let mut engine = engine();
    let id = create_at(&mut engine, "t", Duration::minutes(30), t0());
    engine.delete(&id, t0());
    let events = engine.tick(t0() + Duration::hours(24));
    assert!(matches!(events.as_slice(), [Event::GraveEvicted { .. }]));
}

#[test]
fn resurrection_preserves_duration_not_deadline() {
    let mut engine = engine();
    let id = create_at(&mut engine, "t", Duration::minutes(30), t0());
    engine.delete(&id, t0());

    let hold_start = t0() + Duration::hours(1);
    assert!(engine.begin_hold(&id, hold_start));
    let fire = hold_start + Duration::seconds(3);
    let events = engine.tick(fire);
    match events.as_slice() {
        [Event::GraveResurrected { grave_id, task, .. }] => {
            assert_eq!(*grave_id, id);
            assert_ne!(task.id, id);
            assert_eq!(task.created, fire);
            assert_eq!(task.deadline, fire + Duration::minutes(30));
        }
        other => panic!("expected a single GraveResurrected, got {other:?}"),
    }
    assert!(engine.graveyard().is_empty());
    assert_eq!(engine.active().len(), 1);
    assert_disjoint(&engine, fire);
}

#[test]
fn short_hold_release_changes_nothing() {
    let mut engine = engine();
    let id = create_at(&mut engine, "t", Duration::minutes(30), t0());
    engine.delete(&id, t0());

    // Released 2.9 seconds in, before the 3-second timer fires.
    engine.begin_hold(&id, t0());
    assert!(engine.cancel_hold(&id));
    assert!(engine.tick(t0() + Duration::seconds(5)).is_empty());
    assert!(engine.graveyard().contains(&id));
    assert!(engine.active().is_empty());

    // A full hold afterwards still works.
    let restart = t0() + Duration::seconds(10);
    engine.begin_hold(&id, restart);
    let events = engine.tick(restart + Duration::seconds(3));
    assert!(matches!(events.as_slice(), [Event::GraveResurrected { .. }]));
}

#[test]
fn restarting_a_hold_replaces_the_pending_timer() {
    let mut engine = engine();
    let id = create_at(&mut engine, "t", Duration::minutes(30), t0());
    engine.delete(&id, t0());

    engine.begin_hold(&id, t0());
    engine.begin_hold(&id, t0() + Duration::seconds(2));
    // The first timer's due instant passes without firing.
    assert!(engine.tick(t0() + Duration::seconds(3)).is_empty());
    let events = engine.tick(t0() + Duration::seconds(5));
    assert!(matches!(events.as_slice(), [Event::GraveResurrected { .. }]));
}

#[test]
fn eviction_beats_a_hold_due_in_the_same_tick() {
    let mut engine = engine();
    let id = create_at(&mut engine, "t", Duration::minutes(30), t0());
    engine.delete(&id, t0());

    let boundary = t0() + Duration::hours(24);
    engine.begin_hold(&id, boundary - Duration::seconds(3));
    let events = engine.tick(boundary);
    assert!(matches!(events.as_slice(), [Event::GraveEvicted { .. }]));
    assert!(engine.active().is_empty());
    assert!(engine.graveyard().is_empty());
    // The invalidated timer never fires later.
    assert!(engine.tick(boundary + Duration::seconds(10)).is_empty());
}

#[test]
fn completion_before_the_sweep_wins_over_expiration() {
    let mut engine = engine();
    let id = create_at(&mut engine, "t", Duration::seconds(100), t0());

    let lapse = t0() + Duration::seconds(100);
    assert!(engine.complete(&id, lapse).is_some());
    assert!(engine.tick(lapse).is_empty());
    assert!(engine.graveyard().is_empty());
    assert_eq!(engine.counters().completed, 1);
    assert_eq!(engine.counters().expired, 0);
    assert_eq!(engine.counters().streak, 1);
}

#[test]
fn observed_expiration_wins_over_late_completion() {
    let mut engine = engine();
    let id = create_at(&mut engine, "t", Duration::seconds(100), t0());

    let lapse = t0() + Duration::seconds(100);
    engine.tick(lapse);
    assert!(engine.complete(&id, lapse).is_none());
    engine.tick(lapse + Duration::seconds(1));
    assert!(engine.graveyard().contains(&id));
    assert_eq!(engine.counters().completed, 0);
    assert_eq!(engine.counters().expired, 1);
}

#[test]
fn complete_and_delete_are_idempotent() {
    let mut engine = engine();
    let a = create_at(&mut engine, "a", Duration::minutes(30), t0());
    let b = create_at(&mut engine, "b", Duration::minutes(30), t0());

    assert!(engine.complete(&a, t0()).is_some());
    assert!(engine.complete(&a, t0()).is_none());
    assert_eq!(engine.counters().completed, 1);

    assert!(engine.delete(&b, t0()).is_some());
    assert!(engine.delete(&b, t0()).is_none());
    assert_eq!(engine.counters().expired, 1);
}

#[test]
fn manual_delete_resets_streak_and_counts_as_failure() {
    let mut engine = engine();
    let a = create_at(&mut engine, "a", Duration::minutes(30), t0());
    engine.complete(&a, t0());
    assert_eq!(engine.counters().streak, 1);

    let b = create_at(&mut engine, "b", Duration::minutes(30), t0());
    engine.delete(&b, t0());
    assert_eq!(engine.counters().streak, 0);
    assert_eq!(engine.snapshot(t0()).success_rate, 0.5);
}

#[test]
fn stores_stay_disjoint_across_a_mixed_scenario() {
    let mut engine = engine();
    let mut now = t0();
    create_at(&mut engine, "short", Duration::seconds(30), now);
    create_at(&mut engine, "long", Duration::hours(3), now);
    let doomed = create_at(&mut engine, "doomed", Duration::minutes(1), now);
    engine.delete(&doomed, now);
    assert_disjoint(&engine, now);

    for _ in 0..130 {
        now += Duration::seconds(1);
        engine.tick(now);
        assert_disjoint(&engine, now);
    }
    // The 30s task expired and settled along the way.
    assert_eq!(engine.active().len(), 1);
    assert_eq!(engine.graveyard().len(), 2);

    engine.begin_hold(&doomed, now);
    now += Duration::seconds(3);
    engine.tick(now);
    assert_disjoint(&engine, now);
    assert_eq!(engine.active().len(), 2);
}

#[test]
fn snapshot_reports_retention_and_remaining() {
    let mut engine = engine();
    let id = create_at(&mut engine, "t", Duration::minutes(30), t0());
    engine.delete(&id, t0());
    let later = t0() + Duration::hours(12);
    let snap = engine.snapshot(later);
    assert_eq!(snap.graveyard.len(), 1);
    assert_eq!(
        snap.graveyard[0].remaining_retention_ms,
        Duration::hours(12).num_milliseconds()
    );
    assert_eq!(
        snap.graveyard[0].original_duration_ms,
        Duration::minutes(30).num_milliseconds()
    );
}
