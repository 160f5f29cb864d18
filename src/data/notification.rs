//! Transient notifications with time-to-live expiry.
//!
//! Removal is idempotent: TTL expiry and an explicit dismiss may race, the
//! first one removes the notification and the second is a no-op.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::random::RandomSource;

/// Default time a notification stays visible.
pub const DEFAULT_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Info => "ℹ",
            Severity::Success => "✓",
            Severity::Warning => "⚠",
            Severity::Error => "✗",
        }
    }
}

/// Canned alerts emitted at random by the fast timer.
pub const ALERT_CATALOG: [(&str, Severity); 4] = [
    ("High memory usage detected", Severity::Warning),
    ("Agent response time threshold exceeded", Severity::Warning),
    ("New document uploaded for analysis", Severity::Info),
    ("Quality check completed successfully", Severity::Success),
];

/// Pick one alert uniformly from [`ALERT_CATALOG`].
pub fn random_alert<R: RandomSource + ?Sized>(rng: &mut R) -> (&'static str, Severity) {
    ALERT_CATALOG[rng.pick(ALERT_CATALOG.len())]
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    #[serde(skip)]
    pub created_at: Instant,
    pub ttl: Duration,
}

impl Notification {
    pub fn expires_at(&self) -> Instant {
        self.created_at + self.ttl
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at()
    }
}

/// Live notifications, oldest first.
#[derive(Debug, Default, Clone)]
pub struct NotificationCenter {
    active: Vec<Notification>,
    next_id: u64,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a notification. Rejects empty or whitespace-only messages.
    pub fn notify(
        &mut self,
        message: &str,
        severity: Severity,
        ttl: Duration,
        now: Instant,
    ) -> Result<NotificationId> {
        if message.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "notification message must not be empty".to_string(),
            ));
        }
        if ttl.is_zero() {
            return Err(EngineError::InvalidInput(
                "notification ttl must be positive".to_string(),
            ));
        }

        self.next_id += 1;
        let id = NotificationId(self.next_id);
        self.active.push(Notification {
            id,
            message: message.to_string(),
            severity,
            created_at: now,
            ttl,
        });
        Ok(id)
    }

    /// Remove a notification. Returns false if it was already gone.
    pub fn remove(&mut self, id: NotificationId) -> bool {
        let before = self.active.len();
        self.active.retain(|n| n.id != id);
        self.active.len() != before
    }

    /// Remove every notification whose TTL has elapsed at `now`.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.active.len();
        self.active.retain(|n| !n.is_expired(now));
        before - self.active.len()
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.active.iter().find(|n| n.id == id)
    }

    /// Most recently created notification still alive.
    pub fn newest(&self) -> Option<&Notification> {
        self.active.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedRandom;

    #[test]
    fn test_empty_message_rejected() {
        let mut center = NotificationCenter::new();
        let err = center.notify("   ", Severity::Info, DEFAULT_TTL, Instant::now()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert!(center.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut center = NotificationCenter::new();
        let id = center.notify("saved", Severity::Success, DEFAULT_TTL, Instant::now()).unwrap();
        assert!(center.remove(id));
        assert!(!center.remove(id));
        assert!(center.get(id).is_none());
    }

    #[test]
    fn test_expire_then_dismiss() {
        let mut center = NotificationCenter::new();
        let start = Instant::now();
        let short = center.notify("short", Severity::Info, Duration::from_secs(1), start).unwrap();
        let long = center.notify("long", Severity::Info, Duration::from_secs(10), start).unwrap();

        assert_eq!(center.expire(start + Duration::from_millis(999)), 0);
        assert_eq!(center.expire(start + Duration::from_secs(1)), 1);
        assert!(!center.remove(short));
        assert_eq!(center.newest().map(|n| n.id), Some(long));
        assert_eq!(center.len(), 1);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut center = NotificationCenter::new();
        let a = center.notify("a", Severity::Info, DEFAULT_TTL, Instant::now()).unwrap();
        center.remove(a);
        let b = center.notify("b", Severity::Info, DEFAULT_TTL, Instant::now()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_alert_catalog() {
        assert_eq!(random_alert(&mut FixedRandom(0.0)).0, "High memory usage detected");
        assert_eq!(random_alert(&mut FixedRandom(0.99)).1, Severity::Success);
    }
}
