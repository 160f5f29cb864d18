//! The simulated telemetry engine.
//!
//! [`TelemetryEngine`] is the single registry that owns every displayed
//! entity. Each operation is a synchronous read-modify-write that runs to
//! completion, so hosts may interleave fast and slow ticks freely as long as
//! they hold exclusive access for the duration of a call.
//!
//! ```
//! use agentwatch::{EngineConfig, FixedRandom, TelemetryEngine};
//!
//! let mut engine = TelemetryEngine::new(EngineConfig::default(), FixedRandom(0.5)).unwrap();
//! engine.tick();
//! engine.health_tick();
//! assert_eq!(engine.tick_count(), 1);
//! ```

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::data::notification::random_alert;
use crate::data::{
    CheckState, Feed, FeedMessage, HealthIndicator, HealthState, MetricSample, Notification,
    NotificationCenter, NotificationId, QualityCheck, Severity, StatusEntity, Thresholds, Upload,
    UploadCandidate, UploadState, WorkflowGraph,
};
use crate::error::{EngineError, Result};
use crate::random::{RandomSource, SeededRandom};

/// Point-in-time copy of every entity, consumed by renderers and exports.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineSnapshot {
    pub metrics: Vec<MetricSample>,
    pub agents: Vec<StatusEntity>,
    pub health: Vec<HealthIndicator>,
    pub feed: Vec<FeedMessage>,
    pub notifications: Vec<Notification>,
    pub uploads: Vec<Upload>,
    pub quality_checks: Vec<QualityCheck>,
    pub tick_count: u64,
    pub health_tick_count: u64,
    /// Set by the driver while ticking is suspended.
    pub paused: bool,
}

impl EngineSnapshot {
    /// Number of health indicators currently reporting a warning.
    pub fn health_warnings(&self) -> usize {
        self.health.iter().filter(|h| h.state == HealthState::Warning).count()
    }
}

/// Owner of all simulated dashboard state.
#[derive(Debug)]
pub struct TelemetryEngine<R: RandomSource = SeededRandom> {
    config: EngineConfig,
    thresholds: Thresholds,
    rng: R,
    metrics: Vec<MetricSample>,
    agents: Vec<StatusEntity>,
    health: Vec<HealthIndicator>,
    feed: Feed,
    notifications: NotificationCenter,
    uploads: Vec<Upload>,
    quality_checks: Vec<QualityCheck>,
    workflow: WorkflowGraph,
    tick_count: u64,
    health_tick_count: u64,
}

impl TelemetryEngine<SeededRandom> {
    /// Build an engine whose random source follows `config.seed`.
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        Self::new(config, rng)
    }
}

impl<R: RandomSource> TelemetryEngine<R> {
    /// Validate `config` and populate entities from its scenario.
    pub fn new(config: EngineConfig, rng: R) -> Result<Self> {
        config.validate()?;

        let thresholds = Thresholds::default();
        let scenario = &config.scenario;
        let metrics = scenario
            .metrics
            .iter()
            .map(|seed| MetricSample::new(seed.name.clone(), seed.unit, seed.value))
            .collect();
        let health = scenario.health.iter().map(HealthIndicator::new).collect();

        Ok(Self {
            thresholds,
            rng,
            metrics,
            agents: scenario.agents.clone(),
            health,
            feed: Feed::with_capacity(config.feed_capacity),
            notifications: NotificationCenter::new(),
            uploads: Vec::new(),
            quality_checks: scenario.quality_checks.clone(),
            workflow: scenario.workflow.clone(),
            tick_count: 0,
            health_tick_count: 0,
            config,
        })
    }

    /// Fast timer body: perturb every metric, then let agent states drift.
    pub fn tick(&mut self) {
        for metric in &mut self.metrics {
            let draw = self.rng.next_f64();
            metric.apply_draw(draw, &self.thresholds);
        }

        let probability = self.config.status_change_probability;
        let mut changed = 0;
        for agent in &mut self.agents {
            let before = agent.state;
            agent.drift(probability, &mut self.rng);
            if agent.state != before {
                changed += 1;
            }
        }

        self.tick_count += 1;
        debug!(tick = self.tick_count, agents_changed = changed, "fast tick");
    }

    /// Slow timer body: re-roll every health indicator independently.
    pub fn health_tick(&mut self) {
        let probability = self.config.health_issue_probability;
        for indicator in &mut self.health {
            indicator.check(probability, &mut self.rng);
        }

        self.health_tick_count += 1;
        let warnings = self.health.iter().filter(|h| h.state == HealthState::Warning).count();
        debug!(tick = self.health_tick_count, warnings, "health check");
    }

    /// Possibly emit one alert from the catalog.
    pub fn alert_tick(&mut self) -> Option<NotificationId> {
        if self.rng.next_f64() >= self.config.alert_probability {
            return None;
        }
        let (message, severity) = random_alert(&mut self.rng);
        self.notify(message, severity).ok()
    }

    /// Feed timer body: append one canned agent message.
    pub fn message_tick(&mut self) {
        let message = FeedMessage::random(&mut self.rng);
        self.push_message(message);
    }

    /// Append to the feed, evicting the oldest message on overflow.
    pub fn push_message(&mut self, message: FeedMessage) -> Option<FeedMessage> {
        debug!(source = %message.source_id, kind = message.kind.label(), "feed message");
        self.feed.push(message)
    }

    /// Raise a notification with the configured TTL.
    pub fn notify(&mut self, message: &str, severity: Severity) -> Result<NotificationId> {
        let ttl = self.config.notification_ttl();
        self.notify_at(message, severity, ttl, Instant::now())
    }

    /// Raise a notification with an explicit TTL and creation time.
    pub fn notify_at(
        &mut self,
        message: &str,
        severity: Severity,
        ttl: std::time::Duration,
        now: Instant,
    ) -> Result<NotificationId> {
        let id = self.notifications.notify(message, severity, ttl, now)?;
        info!(id = id.0, ?severity, text = message, "notification");
        Ok(id)
    }

    /// Remove a notification. Removing one that is already gone is a no-op.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        self.notifications.remove(id)
    }

    /// Remove every notification whose TTL has elapsed.
    pub fn expire_notifications(&mut self, now: Instant) -> usize {
        self.notifications.expire(now)
    }

    /// Validate and begin a simulated upload.
    ///
    /// Rejected uploads raise an error notification and return the rejection.
    pub fn start_upload(&mut self, candidate: &UploadCandidate) -> Result<()> {
        if let Err(err) = candidate.validate() {
            if let EngineError::UploadRejected(reason) = &err {
                self.notify(reason, Severity::Error)?;
            }
            return Err(err);
        }
        info!(name = %candidate.name, size = candidate.size, "upload started");
        self.uploads.insert(0, Upload::start(candidate));
        Ok(())
    }

    /// Begin auto-fixing the quality check at `index`.
    pub fn start_fix(&mut self, index: usize, now: Instant) -> bool {
        let duration = self.config.fix_duration();
        self.quality_checks
            .get_mut(index)
            .is_some_and(|check| check.start_fix(now, duration))
    }

    /// Advance uploads one step and complete due fixes.
    ///
    /// Returns the notifications raised so the caller can schedule expiry.
    pub fn step_activities(&mut self, now: Instant) -> Vec<NotificationId> {
        let mut completed: Vec<String> = Vec::new();
        for upload in &mut self.uploads {
            if upload.step(&mut self.rng) {
                completed.push(format!("File {} uploaded successfully", upload.name));
            }
        }

        let mut fixed = 0;
        for check in &mut self.quality_checks {
            if check.poll_fix(now) {
                fixed += 1;
            }
        }

        let mut raised = Vec::new();
        for message in completed {
            raised.extend(self.notify(&message, Severity::Success).ok());
        }
        for _ in 0..fixed {
            raised.extend(self.notify("Issue resolved automatically", Severity::Success).ok());
        }
        raised
    }

    /// True while any upload or fix still needs activity steps.
    pub fn has_pending_activity(&self) -> bool {
        self.uploads.iter().any(|u| u.state == UploadState::Processing)
            || self.quality_checks.iter().any(|c| c.state == CheckState::Fixing)
    }

    /// Copy every entity for rendering or export.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            metrics: self.metrics.clone(),
            agents: self.agents.clone(),
            health: self.health.clone(),
            feed: self.feed.to_vec(),
            notifications: self.notifications.iter().cloned().collect(),
            uploads: self.uploads.clone(),
            quality_checks: self.quality_checks.clone(),
            tick_count: self.tick_count,
            health_tick_count: self.health_tick_count,
            paused: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn metrics(&self) -> &[MetricSample] {
        &self.metrics
    }

    pub fn agents(&self) -> &[StatusEntity] {
        &self.agents
    }

    pub fn health(&self) -> &[HealthIndicator] {
        &self.health
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn uploads(&self) -> &[Upload] {
        &self.uploads
    }

    pub fn quality_checks(&self) -> &[QualityCheck] {
        &self.quality_checks
    }

    pub fn workflow(&self) -> &WorkflowGraph {
        &self.workflow
    }

    /// Number of fast tick bodies executed.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Number of health tick bodies executed.
    pub fn health_tick_count(&self) -> u64 {
        self.health_tick_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AgentState, Classification, MessageKind};
    use crate::random::{FixedRandom, SequenceRandom};

    fn engine_with<R: RandomSource>(rng: R) -> TelemetryEngine<R> {
        TelemetryEngine::new(EngineConfig::default(), rng).unwrap()
    }

    #[test]
    fn test_midpoint_draws_change_nothing() {
        let mut engine = engine_with(FixedRandom(0.5));
        let before = engine.snapshot();
        engine.tick();
        engine.health_tick();
        assert!(engine.alert_tick().is_none());

        let after = engine.snapshot();
        assert_eq!(before.metrics, after.metrics);
        assert_eq!(before.agents, after.agents);
        assert!(after.health.iter().all(|h| h.state == HealthState::Ok));
        assert!(after.notifications.is_empty());
    }

    #[test]
    fn test_tick_reclassifies_with_value() {
        let mut config = EngineConfig::default();
        config.scenario.metrics.truncate(1);
        config.scenario.metrics[0].value = 2.0;
        config.scenario.agents.clear();
        let mut engine = TelemetryEngine::new(config, FixedRandom(0.999)).unwrap();

        assert_eq!(engine.metrics()[0].classification, Classification::Ok);
        engine.tick();
        assert_eq!(engine.metrics()[0].value, 2.1);
        assert_eq!(engine.metrics()[0].classification, Classification::Warn);
    }

    #[test]
    fn test_alert_tick_emits_from_catalog() {
        let mut engine = engine_with(SequenceRandom::new([0.01, 0.3], 0.5));
        let id = engine.alert_tick().unwrap();
        let notification = engine.notifications().get(id).unwrap();
        assert_eq!(notification.message, "Agent response time threshold exceeded");
        assert_eq!(notification.severity, Severity::Warning);
    }

    #[test]
    fn test_message_tick_respects_capacity() {
        let config = EngineConfig {
            feed_capacity: 3,
            ..Default::default()
        };
        let mut engine = TelemetryEngine::new(config, FixedRandom(0.9)).unwrap();
        for _ in 0..5 {
            engine.message_tick();
        }
        assert_eq!(engine.feed().len(), 3);
        assert!(engine.feed().iter().all(|m| m.kind == MessageKind::Notification));
    }

    #[test]
    fn test_rejected_upload_notifies() {
        let mut engine = engine_with(FixedRandom(0.5));
        let result = engine.start_upload(&UploadCandidate::new("photo.png", 10));
        assert!(result.is_err());
        assert!(engine.uploads().is_empty());
        let newest = engine.notifications().newest().unwrap();
        assert_eq!(newest.message, "File type not supported.");
        assert_eq!(newest.severity, Severity::Error);
    }

    #[test]
    fn test_upload_and_fix_complete_with_notifications() {
        let mut engine = engine_with(FixedRandom(0.999_999));
        engine.start_upload(&UploadCandidate::new("rfp.pdf", 2048)).unwrap();
        let start = Instant::now();
        assert!(engine.start_fix(0, start));
        assert!(!engine.start_fix(3, start), "passed checks cannot be fixed again");
        assert!(engine.has_pending_activity());

        let mut raised = Vec::new();
        for step in 1..=11u32 {
            let now = start + std::time::Duration::from_millis(200) * step;
            raised.extend(engine.step_activities(now));
        }

        assert_eq!(raised.len(), 2);
        let messages: Vec<_> = raised
            .iter()
            .filter_map(|id| engine.notifications().get(*id))
            .map(|n| n.message.as_str())
            .collect();
        assert!(messages.contains(&"File rfp.pdf uploaded successfully"));
        assert!(messages.contains(&"Issue resolved automatically"));
        assert!(!engine.has_pending_activity());
    }

    #[test]
    fn test_each_due_fix_raises_one_notice() {
        let mut engine = engine_with(FixedRandom(0.5));
        let start = Instant::now();
        let later = start + std::time::Duration::from_secs(1);
        assert!(engine.start_fix(0, start));
        assert!(engine.start_fix(1, later));

        assert!(engine.step_activities(start).is_empty());
        assert_eq!(engine.quality_checks()[0].state, CheckState::Fixing);

        // Only the first fix is due two seconds in
        let first = engine.step_activities(start + std::time::Duration::from_secs(2));
        assert_eq!(first.len(), 1);
        assert_eq!(engine.quality_checks()[0].state, CheckState::Passed);
        assert_eq!(engine.quality_checks()[1].state, CheckState::Fixing);

        let second = engine.step_activities(later + std::time::Duration::from_secs(2));
        assert_eq!(second.len(), 1);
        assert_eq!(engine.quality_checks()[1].state, CheckState::Passed);
        assert!(engine.step_activities(later + std::time::Duration::from_secs(9)).is_empty());
    }

    #[test]
    fn test_zero_status_probability_freezes_agents() {
        let config = EngineConfig {
            status_change_probability: 0.0,
            ..Default::default()
        };
        let mut engine = TelemetryEngine::new(config, SeededRandom::new(9)).unwrap();
        let before: Vec<AgentState> = engine.agents().iter().map(|a| a.state).collect();
        for _ in 0..500 {
            engine.tick();
        }
        let after: Vec<AgentState> = engine.agents().iter().map(|a| a.state).collect();
        assert_eq!(before, after);
    }
}
