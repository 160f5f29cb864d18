//! Metric samples, clamped random-walk perturbation and classification.
//!
//! All functions here are pure: a draw in `[0, 1)` goes in, a new value and
//! its classification come out. The engine supplies the draws.

use serde::{Deserialize, Serialize};

/// Unit of a displayed metric. Determines step size, valid range and thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricUnit {
    /// Response latency in seconds.
    Seconds,
    /// Resource utilization percentage.
    Percent,
    /// Raw count (tasks, documents, agents).
    Count,
}

impl MetricUnit {
    /// Half-width of the symmetric perturbation window.
    pub fn step(&self) -> f64 {
        match self {
            MetricUnit::Seconds => 0.1,
            MetricUnit::Percent => 5.0,
            MetricUnit::Count => 2.0,
        }
    }

    /// Valid range for values of this unit.
    pub fn range(&self) -> (f64, f64) {
        match self {
            MetricUnit::Seconds => (0.1, f64::MAX),
            MetricUnit::Percent => (5.0, 95.0),
            MetricUnit::Count => (0.0, f64::MAX),
        }
    }

    /// Suffix used when formatting a value.
    pub fn suffix(&self) -> &'static str {
        match self {
            MetricUnit::Seconds => "s",
            MetricUnit::Percent => "%",
            MetricUnit::Count => "",
        }
    }
}

/// Display classification derived from a metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Ok,
    Warn,
    Critical,
}

impl Classification {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Classification::Ok => "OK",
            Classification::Warn => "WARN",
            Classification::Critical => "CRIT",
        }
    }
}

/// Upper bounds (inclusive) for the `ok` and `warn` bands of each unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub latency_ok: f64,
    pub latency_warn: f64,
    pub utilization_ok: f64,
    pub utilization_warn: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            latency_ok: 2.0,
            latency_warn: 3.0,
            utilization_ok: 50.0,
            utilization_warn: 75.0,
        }
    }
}

impl Thresholds {
    /// Classify a value. Counts have no thresholds and are always `Ok`.
    pub fn classify(&self, unit: MetricUnit, value: f64) -> Classification {
        let (ok, warn) = match unit {
            MetricUnit::Seconds => (self.latency_ok, self.latency_warn),
            MetricUnit::Percent => (self.utilization_ok, self.utilization_warn),
            MetricUnit::Count => return Classification::Ok,
        };

        if value <= ok {
            Classification::Ok
        } else if value <= warn {
            Classification::Warn
        } else {
            Classification::Critical
        }
    }
}

/// Map a draw in `[0, 1)` to a perturbation for the given unit.
///
/// Latency and utilization are continuous. Counts move in whole steps, each
/// integer in `-step..=step` equally likely.
pub fn perturbation(unit: MetricUnit, draw: f64) -> f64 {
    match unit {
        MetricUnit::Count => {
            let step = unit.step();
            let buckets = 2.0 * step + 1.0;
            (draw * buckets).floor().clamp(0.0, buckets - 1.0) - step
        }
        _ => (draw - 0.5) * 2.0 * unit.step(),
    }
}

/// Clamp a value into the unit's valid range.
pub fn clamp(unit: MetricUnit, value: f64) -> f64 {
    let (min, max) = unit.range();
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

/// A displayed metric with its current classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub name: String,
    pub value: f64,
    pub unit: MetricUnit,
    pub classification: Classification,
}

impl MetricSample {
    /// Create a sample, clamping the initial value and classifying it.
    pub fn new(name: impl Into<String>, unit: MetricUnit, value: f64) -> Self {
        let mut sample = Self {
            name: name.into(),
            value: 0.0,
            unit,
            classification: Classification::Ok,
        };
        sample.set_value(value, &Thresholds::default());
        sample
    }

    /// Replace the value, clamping and reclassifying in one step.
    pub fn set_value(&mut self, value: f64, thresholds: &Thresholds) {
        let mut value = clamp(self.unit, value);
        if self.unit == MetricUnit::Seconds {
            value = (value * 10.0).round() / 10.0;
            value = clamp(self.unit, value);
        }
        self.value = value;
        self.classification = thresholds.classify(self.unit, value);
    }

    /// Apply one random-walk step driven by `draw`.
    pub fn apply_draw(&mut self, draw: f64, thresholds: &Thresholds) {
        let next = self.value + perturbation(self.unit, draw);
        self.set_value(next, thresholds);
    }

    /// Value formatted with its unit suffix.
    pub fn display_value(&self) -> String {
        match self.unit {
            MetricUnit::Seconds => format!("{:.1}{}", self.value, self.unit.suffix()),
            MetricUnit::Percent => format!("{}{}", self.value.round(), self.unit.suffix()),
            MetricUnit::Count => format!("{}", self.value.round()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_classification_boundaries() {
        let t = Thresholds::default();
        assert_eq!(t.classify(MetricUnit::Seconds, 2.0), Classification::Ok);
        assert_eq!(t.classify(MetricUnit::Seconds, 2.5), Classification::Warn);
        assert_eq!(t.classify(MetricUnit::Seconds, 3.0), Classification::Warn);
        assert_eq!(t.classify(MetricUnit::Seconds, 3.5), Classification::Critical);
    }

    #[test]
    fn test_utilization_classification_boundaries() {
        let t = Thresholds::default();
        assert_eq!(t.classify(MetricUnit::Percent, 50.0), Classification::Ok);
        assert_eq!(t.classify(MetricUnit::Percent, 50.5), Classification::Warn);
        assert_eq!(t.classify(MetricUnit::Percent, 75.0), Classification::Warn);
        assert_eq!(t.classify(MetricUnit::Percent, 80.0), Classification::Critical);
    }

    #[test]
    fn test_counts_are_always_ok() {
        let t = Thresholds::default();
        assert_eq!(t.classify(MetricUnit::Count, 10_000.0), Classification::Ok);
    }

    #[test]
    fn test_perturbation_extremes() {
        assert!((perturbation(MetricUnit::Seconds, 0.0) + 0.1).abs() < 1e-9);
        assert!((perturbation(MetricUnit::Percent, 0.0) + 5.0).abs() < 1e-9);
        assert_eq!(perturbation(MetricUnit::Count, 0.0), -2.0);
        assert_eq!(perturbation(MetricUnit::Count, 0.5), 0.0);
        assert_eq!(perturbation(MetricUnit::Count, 0.999), 2.0);
    }

    #[test]
    fn test_count_steps_are_uniform() {
        // Five equal-width buckets, one per integer step
        let steps: Vec<f64> = [0.1, 0.3, 0.5, 0.7, 0.9]
            .into_iter()
            .map(|draw| perturbation(MetricUnit::Count, draw))
            .collect();
        assert_eq!(steps, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(perturbation(MetricUnit::Count, 0.19), -2.0);
        assert_eq!(perturbation(MetricUnit::Count, 0.21), -1.0);
        assert_eq!(perturbation(MetricUnit::Count, 1.0), 2.0);
    }

    #[test]
    fn test_utilization_is_clamped_at_both_ends() {
        let t = Thresholds::default();
        let mut low = MetricSample::new("cpu", MetricUnit::Percent, 6.0);
        low.apply_draw(0.0, &t);
        assert_eq!(low.value, 5.0);

        let mut high = MetricSample::new("cpu", MetricUnit::Percent, 94.0);
        high.apply_draw(0.999_999, &t);
        assert_eq!(high.value, 95.0);
        assert_eq!(high.classification, Classification::Critical);
    }

    #[test]
    fn test_latency_floor_and_rounding() {
        let t = Thresholds::default();
        let mut latency = MetricSample::new("response", MetricUnit::Seconds, 0.1);
        latency.apply_draw(0.0, &t);
        assert_eq!(latency.value, 0.1);

        let mut latency = MetricSample::new("response", MetricUnit::Seconds, 1.96);
        latency.apply_draw(0.5, &t);
        assert_eq!(latency.value, 2.0);
        assert_eq!(latency.classification, Classification::Ok);
    }

    #[test]
    fn test_count_floor() {
        let t = Thresholds::default();
        let mut count = MetricSample::new("queued", MetricUnit::Count, 1.0);
        count.apply_draw(0.0, &t);
        assert_eq!(count.value, 0.0);
    }

    #[test]
    fn test_initial_value_is_clamped() {
        let sample = MetricSample::new("memory", MetricUnit::Percent, 120.0);
        assert_eq!(sample.value, 95.0);
        assert_eq!(sample.display_value(), "95%");
    }
}
