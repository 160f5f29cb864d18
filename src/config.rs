//! Engine configuration and the seed scenario.
//!
//! Configuration is plain data with serde defaults, so a TOML file only needs
//! the keys it wants to override:
//!
//! ```toml
//! fast_interval_ms = 2000
//! alert_probability = 0.2
//!
//! [[scenario.metrics]]
//! name = "Avg Response Time"
//! unit = "seconds"
//! value = 1.8
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::data::{AgentState, CheckState, MetricUnit, QualityCheck, StatusEntity, WorkflowGraph};
use crate::error::{EngineError, Result};

/// Recognized engine options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Period of the metric/status/alert timer.
    pub fast_interval_ms: u64,
    /// Period of the health-check timer.
    pub slow_interval_ms: u64,
    /// Period of the communication feed chatter.
    pub feed_interval_ms: u64,
    /// Maximum number of feed messages retained.
    pub feed_capacity: usize,
    /// Lifetime of a notification before automatic removal.
    pub notification_ttl_ms: u64,
    /// Per-tick chance that an agent is reassigned a random state.
    pub status_change_probability: f64,
    /// Per-check chance that a health indicator reports a warning.
    pub health_issue_probability: f64,
    /// Per-tick chance of emitting a catalog alert.
    pub alert_probability: f64,
    /// Time a quality-check auto-fix takes to complete.
    pub fix_duration_ms: u64,
    /// Fixed RNG seed; `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// Initial dashboard contents.
    pub scenario: Scenario,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fast_interval_ms: 5_000,
            slow_interval_ms: 30_000,
            feed_interval_ms: 15_000,
            feed_capacity: 20,
            notification_ttl_ms: 5_000,
            status_change_probability: 0.10,
            health_issue_probability: 0.02,
            alert_probability: 0.05,
            fix_duration_ms: 2_000,
            seed: None,
            scenario: Scenario::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a configuration file (format inferred from the extension)
    /// and validate the result.
    pub fn load(path: &Path) -> Result<Self> {
        let config: EngineConfig = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let intervals = [
            ("fast_interval_ms", self.fast_interval_ms),
            ("slow_interval_ms", self.slow_interval_ms),
            ("feed_interval_ms", self.feed_interval_ms),
            ("notification_ttl_ms", self.notification_ttl_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(EngineError::InvalidInput(format!("{} must be positive", name)));
            }
        }

        if self.feed_capacity == 0 {
            return Err(EngineError::InvalidInput(
                "feed_capacity must be at least 1".to_string(),
            ));
        }

        let probabilities = [
            ("status_change_probability", self.status_change_probability),
            ("health_issue_probability", self.health_issue_probability),
            ("alert_probability", self.alert_probability),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(EngineError::InvalidInput(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }

        for metric in &self.scenario.metrics {
            if !metric.value.is_finite() {
                return Err(EngineError::InvalidInput(format!(
                    "metric {} has a non-finite value",
                    metric.name
                )));
            }
        }

        Ok(())
    }

    pub fn fast_interval(&self) -> Duration {
        Duration::from_millis(self.fast_interval_ms)
    }

    pub fn slow_interval(&self) -> Duration {
        Duration::from_millis(self.slow_interval_ms)
    }

    pub fn feed_interval(&self) -> Duration {
        Duration::from_millis(self.feed_interval_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn fix_duration(&self) -> Duration {
        Duration::from_millis(self.fix_duration_ms)
    }
}

/// Initial value of a tracked metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSeed {
    pub name: String,
    pub unit: MetricUnit,
    pub value: f64,
}

impl MetricSeed {
    fn new(name: &str, unit: MetricUnit, value: f64) -> Self {
        Self {
            name: name.to_string(),
            unit,
            value,
        }
    }
}

/// Entities present when the dashboard starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub metrics: Vec<MetricSeed>,
    pub agents: Vec<StatusEntity>,
    pub health: Vec<String>,
    pub quality_checks: Vec<QualityCheck>,
    pub workflow: WorkflowGraph,
}

impl Default for Scenario {
    fn default() -> Self {
        let metrics = vec![
            MetricSeed::new("Avg Response Time", MetricUnit::Seconds, 1.8),
            MetricSeed::new("Orchestrator Latency", MetricUnit::Seconds, 2.4),
            MetricSeed::new("CPU Usage", MetricUnit::Percent, 45.0),
            MetricSeed::new("Memory Usage", MetricUnit::Percent, 62.0),
            MetricSeed::new("Storage Usage", MetricUnit::Percent, 30.0),
            MetricSeed::new("Active Agents", MetricUnit::Count, 8.0),
            MetricSeed::new("Documents Processed", MetricUnit::Count, 127.0),
            MetricSeed::new("Tasks Queued", MetricUnit::Count, 14.0),
        ];

        let agents = [
            ("Agent Orchestrator", AgentState::Online),
            ("Document Intelligence", AgentState::Processing),
            ("Requirements Engineering", AgentState::Online),
            ("Solution Architecture", AgentState::Waiting),
            ("Risk Assessment", AgentState::Online),
            ("Cost Estimation", AgentState::Waiting),
            ("Project Planning", AgentState::Processing),
            ("Proposal Generation", AgentState::Waiting),
            ("Quality Assurance", AgentState::Online),
        ]
        .into_iter()
        .map(|(id, state)| StatusEntity::new(id, state))
        .collect();

        let health = ["Database", "Message Queue", "Agent Runtime", "File Storage", "API Gateway"]
            .into_iter()
            .map(str::to_string)
            .collect();

        let quality_checks = vec![
            QualityCheck::new("Compliance matrix incomplete", CheckState::Critical),
            QualityCheck::new("Inconsistent pricing references", CheckState::Warning),
            QualityCheck::new("Missing executive summary keywords", CheckState::Warning),
            QualityCheck::new("Document formatting", CheckState::Passed),
        ];

        Self {
            metrics,
            agents,
            health,
            quality_checks,
            workflow: WorkflowGraph::sample(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fast_interval(), Duration::from_secs(5));
        assert_eq!(config.slow_interval(), Duration::from_secs(30));
        assert_eq!(config.feed_capacity, 20);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = EngineConfig {
            fast_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        let config = EngineConfig {
            alert_probability: 1.5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("alert_probability"));

        let config = EngineConfig {
            status_change_probability: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
fast_interval_ms = 1000
status_change_probability = 0.0
seed = 42

[[scenario.metrics]]
name = "Latency"
unit = "seconds"
value = 2.5
"#
        )
        .unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.fast_interval_ms, 1000);
        assert_eq!(config.slow_interval_ms, 30_000);
        assert_eq!(config.status_change_probability, 0.0);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.scenario.metrics.len(), 1);
        // Sections not mentioned keep their defaults
        assert_eq!(config.scenario.agents.len(), 9);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "feed_capacity = 0").unwrap();
        assert!(matches!(
            EngineConfig::load(file.path()),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_load_wraps_malformed_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "fast_interval_ms = \"soon\"").unwrap();
        let err = EngineConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error: "));
    }
}
