//! Unit tests for `IdleDetector`
//!
//! Runs on a paused tokio clock so ten-second windows and the ten-minute
//! ceiling complete instantly.

use std::time::Duration;

use kodegen_long_command::{IdleDetector, IdleOptions, IdleOutcome, MemoryBackend, PaneTarget};
use tokio::time::Instant;

fn target() -> PaneTarget {
    PaneTarget::new("gemini-cli", "0.0")
}

#[tokio::test(start_paused = true)]
async fn test_steady_pane_settles_on_tenth_match() {
    let _ = env_logger::builder().is_test(true).try_init();
    let backend = MemoryBackend::new();
    let started = Instant::now();

    let outcome = IdleDetector::default().wait_for_idle(&backend, &target()).await;

    // The empty pane matches the initial "last seen" value from the first poll.
    assert_eq!(outcome, IdleOutcome::Settled { polls: 10 });
    assert_eq!(backend.capture_count(), 10);
    assert!(started.elapsed() >= Duration::from_secs(10));
    assert!(started.elapsed() < Duration::from_secs(11));
}

#[tokio::test(start_paused = true)]
async fn test_changes_reset_the_stability_count() {
    let backend = MemoryBackend::new();
    backend.script_captures([
        Some("loading |".to_string()),
        Some("loading /".to_string()),
        Some("loading -".to_string()),
    ]);
    backend.set_pane("> ");

    let outcome = IdleDetector::default().wait_for_idle(&backend, &target()).await;

    // Three changing frames, one new steady frame, then ten matches.
    assert_eq!(outcome, IdleOutcome::Settled { polls: 14 });
}

#[tokio::test(start_paused = true)]
async fn test_change_midway_restarts_the_window() {
    let backend = MemoryBackend::new();
    let mut captures: Vec<Option<String>> = vec![Some("a".to_string()); 6];
    captures.push(Some("b".to_string()));
    backend.script_captures(captures);
    backend.set_pane("b");

    let outcome = IdleDetector::default().wait_for_idle(&backend, &target()).await;

    // "a" at poll 1, five matches, "b" at poll 7, ten matches after that.
    assert_eq!(outcome, IdleOutcome::Settled { polls: 17 });
}

#[tokio::test(start_paused = true)]
async fn test_capture_failures_are_retried() {
    let backend = MemoryBackend::new();
    backend.script_captures([None, None, Some("$ ".to_string())]);
    backend.set_pane("$ ");

    let outcome = IdleDetector::default().wait_for_idle(&backend, &target()).await;

    // Failed polls neither count as matches nor abort the wait.
    assert_eq!(outcome, IdleOutcome::Settled { polls: 13 });
}

#[tokio::test(start_paused = true)]
async fn test_failures_do_not_break_a_stable_run() {
    let backend = MemoryBackend::new();
    let mut captures = vec![Some("x".to_string()); 5];
    captures.push(None);
    backend.script_captures(captures);
    backend.set_pane("x");

    let outcome = IdleDetector::default().wait_for_idle(&backend, &target()).await;

    assert_eq!(outcome, IdleOutcome::Settled { polls: 12 });
}

#[tokio::test(start_paused = true)]
async fn test_never_settling_pane_hits_the_ceiling() {
    let backend = MemoryBackend::new();
    backend.script_captures((0..2000).map(|frame| Some(format!("spinner {frame}"))));
    let started = Instant::now();

    let outcome = IdleDetector::default().wait_for_idle(&backend, &target()).await;

    assert_eq!(outcome, IdleOutcome::TimedOut);
    assert!(started.elapsed() >= Duration::from_secs(600));
    assert!(started.elapsed() < Duration::from_secs(601));
    assert!((599..=600).contains(&backend.capture_count()));
}

#[tokio::test(start_paused = true)]
async fn test_custom_options() {
    let backend = MemoryBackend::new();
    backend.set_pane("ready");
    let detector = IdleDetector::new(IdleOptions {
        poll_interval: Duration::from_millis(250),
        required_stable_checks: 3,
        max_wait: Duration::from_secs(30),
    });
    let started = Instant::now();

    let outcome = detector.wait_for_idle(&backend, &target()).await;

    assert_eq!(outcome, IdleOutcome::Settled { polls: 4 });
    assert!(started.elapsed() >= Duration::from_secs(1));
    assert!(started.elapsed() < Duration::from_secs(2));
}
