//! System health indicators refreshed by the slow timer.

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Ok,
    Warning,
}

impl HealthState {
    pub fn symbol(&self) -> &'static str {
        match self {
            HealthState::Ok => "✓",
            HealthState::Warning => "⚠",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthIndicator {
    pub name: String,
    pub state: HealthState,
}

impl HealthIndicator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: HealthState::Ok,
        }
    }

    /// Re-roll the indicator with one independent draw.
    pub fn check<R: RandomSource + ?Sized>(&mut self, issue_probability: f64, rng: &mut R) {
        self.state = if rng.next_f64() < issue_probability {
            HealthState::Warning
        } else {
            HealthState::Ok
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedRandom;

    #[test]
    fn test_check_recovers_to_ok() {
        let mut indicator = HealthIndicator::new("Database");
        indicator.check(0.02, &mut FixedRandom(0.01));
        assert_eq!(indicator.state, HealthState::Warning);
        indicator.check(0.02, &mut FixedRandom(0.5));
        assert_eq!(indicator.state, HealthState::Ok);
    }
}
