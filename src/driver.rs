//! Timer-driven scheduling for the telemetry engine.
//!
//! [`Driver::spawn`] moves a [`TelemetryEngine`] behind a lock and starts a
//! background task with three repeating timers:
//!
//! ```text
//!   fast  (5s)  ──▶ tick() + alert_tick()
//!   slow  (30s) ──▶ health_tick()
//!   feed  (15s) ──▶ message_tick()
//! ```
//!
//! A second task steps uploads and quality-check fixes every 200ms, and each
//! notification gets its own expiry task. Pausing drops the three timers;
//! resuming builds them again from the current instant, so ticks missed while
//! paused are never replayed. Expiry and activity tasks ignore pause.
//!
//! Every tick body runs under the engine lock with no suspension point, so
//! timers interleave only at tick boundaries. After each mutation the new
//! [`EngineSnapshot`] is published on a watch channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::data::activity::UPLOAD_STEP;
use crate::data::{FeedMessage, NotificationId, Severity, UploadCandidate};
use crate::engine::{EngineSnapshot, TelemetryEngine};
use crate::error::Result;
use crate::random::RandomSource;

/// Lifecycle of the tick timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    Stopped,
}

/// State shared between the handle and the background tasks.
struct Shared<R: RandomSource> {
    engine: Mutex<TelemetryEngine<R>>,
    snapshots: watch::Sender<EngineSnapshot>,
    control: watch::Sender<RunState>,
    /// Highest notification id that already has an expiry task.
    expiry_scheduled: AtomicU64,
    runtime: Handle,
}

impl<R: RandomSource + 'static> Shared<R> {
    /// Publish the engine state and schedule expiry for new notifications.
    ///
    /// Must be called with the engine lock held, right after a mutation.
    fn commit(self: &Arc<Self>, engine: &TelemetryEngine<R>) {
        let mut snapshot = engine.snapshot();
        snapshot.paused = *self.control.borrow() == RunState::Paused;

        let last = self.expiry_scheduled.load(Ordering::Acquire);
        let mut newest = last;
        for notification in engine.notifications().iter().filter(|n| n.id.0 > last) {
            self.schedule_expiry(notification.id, notification.ttl);
            newest = newest.max(notification.id.0);
        }
        self.expiry_scheduled.store(newest, Ordering::Release);

        self.snapshots.send_replace(snapshot);
    }

    fn schedule_expiry(self: &Arc<Self>, id: NotificationId, ttl: Duration) {
        let shared = Arc::clone(self);
        self.runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut engine = shared.engine.lock();
            if engine.dismiss(id) {
                debug!(id = id.0, "notification expired");
                shared.commit(&engine);
            }
        });
    }

    fn fast_tick(self: &Arc<Self>) {
        let mut engine = self.engine.lock();
        engine.tick();
        engine.alert_tick();
        self.commit(&engine);
    }

    fn slow_tick(self: &Arc<Self>) {
        let mut engine = self.engine.lock();
        engine.health_tick();
        self.commit(&engine);
    }

    fn feed_tick(self: &Arc<Self>) {
        let mut engine = self.engine.lock();
        engine.message_tick();
        self.commit(&engine);
    }

    fn activity_step(self: &Arc<Self>) {
        let mut engine = self.engine.lock();
        if !engine.has_pending_activity() {
            return;
        }
        engine.step_activities(Instant::now().into_std());
        self.commit(&engine);
    }
}

/// Entry point for starting the timers.
pub struct Driver;

impl Driver {
    /// Start driving `engine` on `runtime`.
    ///
    /// Timers start in the running state; the first fast tick fires one full
    /// fast interval after this call.
    pub fn spawn<R: RandomSource + 'static>(
        engine: TelemetryEngine<R>,
        runtime: &Handle,
    ) -> DriverHandle<R> {
        let (snapshots, _) = watch::channel(engine.snapshot());
        let (control, control_rx) = watch::channel(RunState::Running);
        let periods = Periods {
            fast: engine.config().fast_interval(),
            slow: engine.config().slow_interval(),
            feed: engine.config().feed_interval(),
        };

        let shared = Arc::new(Shared {
            engine: Mutex::new(engine),
            snapshots,
            control,
            expiry_scheduled: AtomicU64::new(0),
            runtime: runtime.clone(),
        });

        let ticks = runtime.spawn(run_timers(Arc::clone(&shared), periods, control_rx.clone()));
        let activity = runtime.spawn(run_activity(Arc::clone(&shared), control_rx));
        info!(
            fast_ms = periods.fast.as_millis() as u64,
            slow_ms = periods.slow.as_millis() as u64,
            "telemetry driver started"
        );

        DriverHandle {
            shared,
            tasks: vec![ticks, activity],
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Periods {
    fast: Duration,
    slow: Duration,
    feed: Duration,
}

fn fresh_interval(period: Duration) -> tokio::time::Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

async fn run_timers<R: RandomSource + 'static>(
    shared: Arc<Shared<R>>,
    periods: Periods,
    mut control: watch::Receiver<RunState>,
) {
    loop {
        let state = *control.borrow_and_update();
        match state {
            RunState::Stopped => break,
            RunState::Paused => {
                if control.changed().await.is_err() {
                    break;
                }
                continue;
            }
            RunState::Running => {}
        }

        let mut fast = fresh_interval(periods.fast);
        let mut slow = fresh_interval(periods.slow);
        let mut feed = fresh_interval(periods.feed);

        loop {
            tokio::select! {
                _ = fast.tick() => shared.fast_tick(),
                _ = slow.tick() => shared.slow_tick(),
                _ = feed.tick() => shared.feed_tick(),
                changed = control.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    break;
                }
            }
        }
    }
    debug!("tick timers stopped");
}

async fn run_activity<R: RandomSource + 'static>(
    shared: Arc<Shared<R>>,
    mut control: watch::Receiver<RunState>,
) {
    let mut timer = interval(UPLOAD_STEP);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = timer.tick() => shared.activity_step(),
            changed = control.changed() => {
                if changed.is_err() || *control.borrow() == RunState::Stopped {
                    break;
                }
            }
        }
    }
}

/// Control surface for a running driver.
///
/// Dropping the handle stops every background task except pending
/// notification expiries, which finish on their own.
pub struct DriverHandle<R: RandomSource + 'static> {
    shared: Arc<Shared<R>>,
    tasks: Vec<JoinHandle<()>>,
}

impl<R: RandomSource + 'static> DriverHandle<R> {
    /// Receive a fresh snapshot after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// Suspend the tick timers (page hidden).
    pub fn pause(&self) {
        if self.set_state(RunState::Paused) {
            info!("real-time updates paused");
        }
    }

    /// Resume the tick timers on a fresh schedule (page visible).
    ///
    /// Resuming a driver that is already running keeps the current schedule.
    pub fn resume(&self) {
        if self.set_state(RunState::Running) {
            info!("real-time updates resumed");
        }
    }

    /// Flip between paused and running. Returns true if now paused.
    pub fn toggle_pause(&self) -> bool {
        if self.is_paused() {
            self.resume();
            false
        } else {
            self.pause();
            true
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state() == RunState::Paused
    }

    pub fn state(&self) -> RunState {
        *self.shared.control.borrow()
    }

    /// Stop all timers. The engine state stays readable through the handle.
    pub fn shutdown(&self) {
        self.shared.control.send_replace(RunState::Stopped);
    }

    /// Raise a notification that expires after the configured TTL.
    pub fn notify(&self, message: &str, severity: Severity) -> Result<NotificationId> {
        self.with_engine_mut(|engine| engine.notify(message, severity))
    }

    /// Dismiss a notification. Returns false if it had already expired.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.with_engine_mut(|engine| engine.dismiss(id))
    }

    /// Append a message to the feed.
    pub fn push_message(&self, message: FeedMessage) {
        self.with_engine_mut(|engine| {
            engine.push_message(message);
        })
    }

    /// Begin a simulated upload. Rejections also raise an error notification.
    pub fn start_upload(&self, candidate: &UploadCandidate) -> Result<()> {
        self.with_engine_mut(|engine| engine.start_upload(candidate))
    }

    /// Begin auto-fixing the quality check at `index`.
    pub fn start_fix(&self, index: usize) -> bool {
        let now = Instant::now().into_std();
        self.with_engine_mut(|engine| engine.start_fix(index, now))
    }

    /// Run `f` against the engine, then publish the result.
    pub fn with_engine_mut<T>(&self, f: impl FnOnce(&mut TelemetryEngine<R>) -> T) -> T {
        let mut engine = self.shared.engine.lock();
        let result = f(&mut engine);
        self.shared.commit(&engine);
        result
    }

    /// Run `f` against the engine without publishing.
    pub fn with_engine<T>(&self, f: impl FnOnce(&TelemetryEngine<R>) -> T) -> T {
        let engine = self.shared.engine.lock();
        f(&engine)
    }

    /// Returns false when `state` was already current, leaving timers untouched.
    fn set_state(&self, state: RunState) -> bool {
        let changed = self.shared.control.send_if_modified(|current| {
            if *current == state || *current == RunState::Stopped {
                return false;
            }
            *current = state;
            true
        });
        if !changed {
            return false;
        }
        let engine = self.shared.engine.lock();
        self.shared.commit(&engine);
        true
    }
}

impl<R: RandomSource + 'static> Drop for DriverHandle<R> {
    fn drop(&mut self) {
        self.shared.control.send_replace(RunState::Stopped);
        for task in &self.tasks {
            task.abort();
        }
    }
}

impl<R: RandomSource + 'static> std::fmt::Debug for DriverHandle<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverHandle")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::random::FixedRandom;

    fn quiet_engine() -> TelemetryEngine<FixedRandom> {
        TelemetryEngine::new(EngineConfig::default(), FixedRandom(0.5)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let driver = Driver::spawn(quiet_engine(), &Handle::current());

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(driver.snapshot().tick_count, 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(driver.snapshot().tick_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_mutations() {
        let driver = Driver::spawn(quiet_engine(), &Handle::current());
        let mut rx = driver.subscribe();
        rx.borrow_and_update();

        driver.notify("Report exported", Severity::Success).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().notifications.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticks() {
        let driver = Driver::spawn(quiet_engine(), &Handle::current());
        driver.shutdown();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(driver.snapshot().tick_count, 0);
        assert_eq!(driver.state(), RunState::Stopped);

        // Stopped drivers cannot be resumed
        driver.resume();
        assert_eq!(driver.state(), RunState::Stopped);
    }
}
