//! Tests for session lifecycle, eviction and concurrent access.

use serde_json::json;
use std::collections::HashSet;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use strictly_puzzles::{PuzzleParameters, SessionRegistry, SimulatorError};

#[test]
fn test_concurrent_creates_yield_unique_ids() {
    let registry = SessionRegistry::default();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || {
                (0..50)
                    .map(|_| registry.create(PuzzleParameters::hanoi(3)).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: Vec<String> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    let unique: HashSet<&String> = ids.iter().collect();

    assert_eq!(ids.len(), 400);
    assert_eq!(unique.len(), 400);
    assert_eq!(registry.len(), 400);
}

#[test]
fn test_mutations_on_one_session_are_serialized() {
    // With one disk only the first of the competing moves can succeed.
    let registry = SessionRegistry::default();
    let env_id = registry.create(PuzzleParameters::hanoi(1)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            let env_id = env_id.clone();
            thread::spawn(move || {
                registry
                    .with_session(&env_id, |session| {
                        session.simulator_mut().apply_json_move(&json!([1, 0, 2])).is_ok()
                    })
                    .unwrap()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);

    let simulator = registry.get(&env_id).unwrap();
    assert!(simulator.is_goal());
}

#[test]
fn test_different_sessions_are_independent() {
    let registry = SessionRegistry::default();
    let a = registry.create(PuzzleParameters::hanoi(2)).unwrap();
    let b = registry.create(PuzzleParameters::hanoi(2)).unwrap();

    registry
        .with_session(&a, |session| {
            session.simulator_mut().apply_json_move(&json!([1, 0, 1])).unwrap();
        })
        .unwrap();

    let untouched = registry.get(&b).unwrap();
    assert_eq!(untouched.state(), untouched.initial_state());
}

#[test]
fn test_idle_session_is_evicted_on_access() {
    let registry = SessionRegistry::new(Duration::from_millis(50));
    let env_id = registry.create(PuzzleParameters::hanoi(2)).unwrap();

    thread::sleep(Duration::from_millis(120));

    let err = registry.get(&env_id).unwrap_err();
    assert!(matches!(err, SimulatorError::UnknownSession(_)));
    assert!(!registry.contains(&env_id));
}

#[test]
fn test_touch_extends_lifetime() {
    let registry = SessionRegistry::new(Duration::from_millis(200));
    let env_id = registry.create(PuzzleParameters::hanoi(2)).unwrap();

    for _ in 0..4 {
        thread::sleep(Duration::from_millis(80));
        registry.touch(&env_id).unwrap();
    }

    assert!(registry.get(&env_id).is_ok());
}

#[test]
fn test_create_sweeps_expired_sessions() {
    let registry = SessionRegistry::new(Duration::from_millis(50));
    let stale = registry.create(PuzzleParameters::hanoi(2)).unwrap();

    thread::sleep(Duration::from_millis(120));
    let fresh = registry.create(PuzzleParameters::hanoi(2)).unwrap();

    assert!(!registry.contains(&stale));
    assert!(registry.contains(&fresh));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_sweep_skips_session_mid_mutation() {
    let registry = SessionRegistry::new(Duration::from_secs(60));
    let env_id = registry.create(PuzzleParameters::hanoi(2)).unwrap();

    let (locked_tx, locked_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    let worker = {
        let registry = registry.clone();
        let env_id = env_id.clone();
        thread::spawn(move || {
            registry
                .with_session(&env_id, |session| {
                    locked_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    session.simulator_mut().apply_json_move(&json!([1, 0, 2])).unwrap();
                })
                .unwrap();
        })
    };

    locked_rx.recv().unwrap();
    let far_future = Instant::now() + Duration::from_secs(3600);
    assert_eq!(registry.sweep(far_future), 0);
    assert!(registry.contains(&env_id));

    release_tx.send(()).unwrap();
    worker.join().unwrap();

    assert_eq!(registry.sweep(far_future), 1);
    assert!(!registry.contains(&env_id));
}

#[test]
fn test_list_reports_live_sessions() {
    let registry = SessionRegistry::default();
    let a = registry.create(PuzzleParameters::hanoi(2)).unwrap();
    let b = registry.create(PuzzleParameters::hanoi(3)).unwrap();
    registry.delete(&a);

    let listed = registry.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].env_id, b);
    assert_eq!(listed[0].idle_secs, 0);
}

#[test]
fn test_deleted_session_is_unknown() {
    let registry = SessionRegistry::default();
    let env_id = registry.create(PuzzleParameters::hanoi(2)).unwrap();

    assert!(registry.delete(&env_id));
    let err = registry
        .with_session(&env_id, |session| session.simulator().is_goal())
        .unwrap_err();
    assert!(matches!(err, SimulatorError::UnknownSession(_)));
}

#[tokio::test]
async fn test_background_sweeper_evicts_idle_sessions() {
    let registry = SessionRegistry::new(Duration::from_millis(50));
    let env_id = registry.create(PuzzleParameters::hanoi(2)).unwrap();
    let sweeper = registry.spawn_sweeper(Duration::from_millis(20));

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(!registry.contains(&env_id));
    assert!(registry.is_empty());
    sweeper.abort();
}
