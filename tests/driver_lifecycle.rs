//! Driver lifecycle behavior through the public API.
//!
//! Covers the idle / running / paused / complete transitions, frame
//! cancellation on pause and reset, clock re-arming across resume, and
//! run-state-aware parameter updates.

use kinergy::prelude::*;

fn ball_driver() -> AnimationDriver<ManualScheduler> {
    AnimationDriver::new(
        ScenarioParams::BouncingBall(BallParams::default()),
        ManualScheduler::new(),
    )
}

fn run_until_complete(driver: &mut AnimationDriver<ManualScheduler>, start_ms: f64) -> f64 {
    let mut now = start_ms;
    for _ in 0..100_000 {
        if driver.state() != DriverState::Running {
            break;
        }
        driver.tick(now);
        now += 16.0;
    }
    now
}

#[test]
fn full_lifecycle_idle_running_complete() {
    let mut driver = ball_driver();
    assert_eq!(driver.state(), DriverState::Idle);
    driver.start();
    assert_eq!(driver.state(), DriverState::Running);
    run_until_complete(&mut driver, 0.0);
    assert_eq!(driver.state(), DriverState::Complete);
    assert_eq!(driver.snapshot().phase, Phase::Complete);
}

#[test]
fn pause_freezes_state_exactly() {
    let mut driver = ball_driver();
    driver.start();
    driver.tick(0.0);
    driver.tick(16.0);
    driver.tick(32.0);
    driver.pause();
    let frozen = driver.snapshot();

    // Ticks while paused are dropped entirely
    driver.tick(48.0);
    driver.tick(5000.0);
    let after = driver.snapshot();
    assert!((after.progress - frozen.progress).abs() < f64::EPSILON);
    assert!((after.energy.kinetic - frozen.energy.kinetic).abs() < f64::EPSILON);
}

#[test]
fn resume_measures_time_from_the_resume_instant() {
    let mut driver = ball_driver();
    driver.start();
    driver.tick(0.0);
    driver.tick(16.0);
    driver.pause();
    let paused = driver.snapshot().progress;

    // A long wall-clock gap while paused must not advance the model
    driver.start();
    driver.tick(600_000.0);
    assert!((driver.snapshot().progress - paused).abs() < f64::EPSILON);
    driver.tick(600_016.0);
    assert!(driver.snapshot().progress > paused);
}

#[test]
fn reset_restores_the_initial_snapshot() {
    let mut driver = ball_driver();
    let initial = driver.initialize();
    driver.start();
    driver.tick(0.0);
    driver.tick(100.0);
    driver.reset();
    assert_eq!(driver.state(), DriverState::Idle);

    let snap = driver.snapshot();
    assert!((snap.progress - initial.progress).abs() < f64::EPSILON);
    assert!((snap.position.height - initial.position.height).abs() < f64::EPSILON);
    assert!((snap.energy.lost - initial.energy.lost).abs() < f64::EPSILON);
    assert_eq!(snap.phase, initial.phase);
}

#[test]
fn restart_after_complete_reruns_from_scratch() {
    let mut driver = ball_driver();
    driver.start();
    let end_ms = run_until_complete(&mut driver, 0.0);
    assert_eq!(driver.state(), DriverState::Complete);

    driver.start();
    assert_eq!(driver.state(), DriverState::Running);
    assert!((driver.snapshot().progress - 0.0).abs() < f64::EPSILON);
    run_until_complete(&mut driver, end_ms);
    assert_eq!(driver.state(), DriverState::Complete);
}

#[test]
fn two_identical_runs_produce_identical_terminal_snapshots() {
    let terminal = |start_ms: f64| {
        let mut driver = ball_driver();
        driver.start();
        run_until_complete(&mut driver, start_ms);
        serde_json::to_string(&driver.snapshot()).expect("snapshot must serialize")
    };
    // Same frame cadence, different absolute timestamps, same outcome
    assert_eq!(terminal(0.0), terminal(1_000_000.0));
}

#[test]
fn independent_instances_share_no_state() {
    let mut a = ball_driver();
    let mut b = AnimationDriver::new(
        ScenarioParams::Pendulum(PendulumParams::default()),
        ManualScheduler::new(),
    );
    a.start();
    b.start();
    a.tick(0.0);
    a.tick(16.0);
    b.tick(0.0);
    // b saw one zero-delta tick only; a's progress must not bleed into it
    assert!(a.snapshot().progress > 0.0);
    assert!((b.snapshot().progress - 0.0).abs() < f64::EPSILON);
}

#[test]
fn structural_update_while_running_lands_on_reset() {
    let mut driver = ball_driver();
    driver.start();
    driver.tick(0.0);
    driver.tick(16.0);

    let patch = ParamPatch {
        height: Some(4.0),
        ..ParamPatch::default()
    };
    driver.update_parameters(&patch);

    // Mid-run geometry unchanged
    let mid = driver.snapshot();
    assert!(mid.position.height <= BallParams::default().initial_height);

    driver.reset();
    let fresh = driver.snapshot();
    assert!((fresh.position.height - 4.0).abs() < f64::EPSILON);
}

#[test]
fn damping_update_applies_live_to_a_running_pendulum() {
    let mut driver = AnimationDriver::new(
        ScenarioParams::Pendulum(PendulumParams::default()),
        ManualScheduler::new(),
    );
    driver.start();
    driver.tick(0.0);
    driver.tick(16.0);

    let patch = ParamPatch {
        damping: Some(2.0),
        ..ParamPatch::default()
    };
    driver.update_parameters(&patch);

    // Heavy damping from this moment on must bleed energy every frame
    let before = driver.snapshot().energy.lost;
    let mut now = 32.0;
    for _ in 0..200 {
        driver.tick(now);
        now += 16.0;
    }
    assert!(driver.snapshot().energy.lost > before);
}

#[test]
fn update_while_idle_rebuilds_the_static_display() {
    let mut driver = ball_driver();
    let patch = ParamPatch {
        mass: Some(0.2),
        height: Some(3.0),
        rebound_height: Some(1.0),
        ..ParamPatch::default()
    };
    driver.update_parameters(&patch);

    let snap = driver.snapshot();
    assert!((snap.position.height - 3.0).abs() < f64::EPSILON);
    // New budget reflects the new mass and height
    assert!((snap.energy.total - 0.2 * 9.81 * 3.0).abs() < 1e-9);
}

#[test]
fn rebound_height_is_clamped_to_the_drop_height() {
    let mut driver = ball_driver();
    let patch = ParamPatch {
        rebound_height: Some(10.0),
        ..ParamPatch::default()
    };
    driver.update_parameters(&patch);
    driver.start();
    let apex = {
        let mut max_h: f64 = 0.0;
        let mut now = 0.0;
        for _ in 0..100_000 {
            if driver.state() != DriverState::Running {
                break;
            }
            driver.tick(now);
            now += 16.0;
            max_h = max_h.max(driver.snapshot().position.height);
        }
        max_h
    };
    assert!(
        apex <= BallParams::default().initial_height + 1e-9,
        "rebound apex {apex} exceeded the drop height"
    );
}
