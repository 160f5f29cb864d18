use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::sleep;

use agentwatch::data::CheckState;
use agentwatch::{
    Driver, DriverHandle, EngineConfig, FixedRandom, RunState, Severity, TelemetryEngine,
    UploadCandidate,
};

/// Draws of 0.5 never pass any probability gate, so only scheduled work happens.
fn spawn_quiet() -> DriverHandle<FixedRandom> {
    let engine = TelemetryEngine::new(EngineConfig::default(), FixedRandom(0.5)).unwrap();
    Driver::spawn(engine, &Handle::current())
}

#[tokio::test(start_paused = true)]
async fn pause_and_resume_without_catch_up() {
    let driver = spawn_quiet();

    sleep(Duration::from_millis(5_100)).await;
    assert_eq!(driver.snapshot().tick_count, 1);

    driver.pause();
    assert!(driver.snapshot().paused);
    sleep(Duration::from_secs(60)).await;
    let hidden = driver.snapshot();
    assert_eq!(hidden.tick_count, 1);
    assert_eq!(hidden.health_tick_count, 0);
    assert!(hidden.feed.is_empty());

    // Resuming starts a fresh schedule: next tick one full period later
    driver.resume();
    assert!(!driver.snapshot().paused);
    sleep(Duration::from_millis(4_800)).await;
    assert_eq!(driver.snapshot().tick_count, 1);

    sleep(Duration::from_millis(300)).await;
    assert_eq!(driver.snapshot().tick_count, 2);
}

#[tokio::test(start_paused = true)]
async fn slow_and_feed_timers_run_independently() {
    let driver = spawn_quiet();

    sleep(Duration::from_millis(30_100)).await;
    let snapshot = driver.snapshot();
    assert_eq!(snapshot.tick_count, 6);
    assert_eq!(snapshot.health_tick_count, 1);
    assert_eq!(snapshot.feed.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn notifications_expire_while_paused() {
    let driver = spawn_quiet();
    driver.notify("Proposal exported", Severity::Success).unwrap();
    driver.pause();

    sleep(Duration::from_millis(4_900)).await;
    assert_eq!(driver.snapshot().notifications.len(), 1);

    sleep(Duration::from_millis(200)).await;
    assert!(driver.snapshot().notifications.is_empty());
    assert_eq!(driver.state(), RunState::Paused);
}

#[tokio::test(start_paused = true)]
async fn dismiss_races_expiry() {
    let driver = spawn_quiet();
    let first = driver.notify("Check complete", Severity::Info).unwrap();
    let second = driver.notify("Agent restarted", Severity::Warning).unwrap();

    assert!(driver.dismiss(first));
    assert!(!driver.dismiss(first));

    // Expiry of the dismissed one is a no-op; the other still expires
    sleep(Duration::from_secs(6)).await;
    assert!(driver.snapshot().notifications.is_empty());
    assert!(!driver.dismiss(second));
}

#[tokio::test(start_paused = true)]
async fn upload_completes_with_success_notice() {
    let driver = spawn_quiet();
    driver
        .start_upload(&UploadCandidate::new("tender.pdf", 2 * 1024 * 1024))
        .unwrap();

    // 5% per 200ms step reaches 100% after 20 steps
    sleep(Duration::from_millis(4_100)).await;
    let snapshot = driver.snapshot();
    assert_eq!(snapshot.uploads[0].progress, 100.0);
    assert!(snapshot
        .notifications
        .iter()
        .any(|n| n.message == "File tender.pdf uploaded successfully"));
}

#[tokio::test(start_paused = true)]
async fn rejected_upload_raises_error_notice() {
    let driver = spawn_quiet();
    let result = driver.start_upload(&UploadCandidate::new("payload.exe", 1024));
    assert!(result.is_err());

    let snapshot = driver.snapshot();
    assert!(snapshot.uploads.is_empty());
    assert_eq!(snapshot.notifications.len(), 1);
    assert_eq!(snapshot.notifications[0].severity, Severity::Error);
}

#[tokio::test(start_paused = true)]
async fn quality_fix_resolves_after_delay() {
    let driver = spawn_quiet();
    assert!(driver.start_fix(0));
    assert_eq!(driver.snapshot().quality_checks[0].state, CheckState::Fixing);

    sleep(Duration::from_millis(2_300)).await;
    let snapshot = driver.snapshot();
    assert_eq!(snapshot.quality_checks[0].state, CheckState::Passed);
    assert!(snapshot
        .notifications
        .iter()
        .any(|n| n.message == "Issue resolved automatically"));

    // Nothing left to fix
    assert!(!driver.start_fix(0));
}

#[tokio::test(start_paused = true)]
async fn redundant_resume_keeps_schedule() {
    let driver = spawn_quiet();

    // Repeated "visible" signals while already running
    for _ in 0..10 {
        sleep(Duration::from_secs(4)).await;
        driver.resume();
    }
    sleep(Duration::from_millis(100)).await;
    // 40.1s of running time at a 5s period
    assert_eq!(driver.snapshot().tick_count, 8);
    assert_eq!(driver.snapshot().health_tick_count, 1);
    assert_eq!(driver.state(), RunState::Running);
}

#[tokio::test(start_paused = true)]
async fn redundant_pause_is_harmless() {
    let driver = spawn_quiet();
    driver.pause();
    driver.pause();
    sleep(Duration::from_secs(20)).await;
    assert_eq!(driver.snapshot().tick_count, 0);

    driver.resume();
    sleep(Duration::from_millis(5_100)).await;
    assert_eq!(driver.snapshot().tick_count, 1);
}
