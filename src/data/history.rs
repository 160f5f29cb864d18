//! Historical metric values for sparklines.

use std::collections::{HashMap, VecDeque};

use super::metric::MetricSample;

/// Maximum number of historical values kept per metric.
const MAX_HISTORY_SIZE: usize = 60;

/// Tracks recent values of every metric for trend display.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Metric name -> values, oldest first.
    pub values: HashMap<String, VecDeque<f64>>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current value of each metric.
    pub fn record<'a>(&mut self, metrics: impl IntoIterator<Item = &'a MetricSample>) {
        for metric in metrics {
            let values = self.values.entry(metric.name.clone()).or_default();
            values.push_back(metric.value);
            if values.len() > MAX_HISTORY_SIZE {
                values.pop_front();
            }
        }
    }

    /// Number of values recorded for a metric.
    pub fn len(&self, name: &str) -> usize {
        self.values.get(name).map_or(0, VecDeque::len)
    }

    /// Sparkline levels (0-7) for a metric.
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn sparkline(&self, name: &str) -> Vec<u8> {
        let Some(values) = self.values.get(name) else {
            return Vec::new();
        };
        if values.len() < 2 {
            return Vec::new();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;

        values
            .iter()
            .map(|&v| {
                if range <= f64::EPSILON {
                    return 0;
                }
                let normalized = ((v - min) / range * 7.0) as u8;
                normalized.min(7)
            })
            .collect()
    }

    /// Change between the last two recorded values.
    pub fn last_delta(&self, name: &str) -> Option<f64> {
        let values = self.values.get(name)?;
        if values.len() < 2 {
            return None;
        }
        let current = *values.back()?;
        let previous = *values.get(values.len() - 2)?;
        Some(current - previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::metric::MetricUnit;

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::new();
        let mut metric = MetricSample::new("queued", MetricUnit::Count, 0.0);
        for i in 0..100 {
            metric.value = i as f64;
            history.record([&metric]);
        }
        assert_eq!(history.len("queued"), MAX_HISTORY_SIZE);
        assert_eq!(history.values["queued"].front(), Some(&40.0));
    }

    #[test]
    fn test_sparkline_levels() {
        let mut history = History::new();
        let mut metric = MetricSample::new("cpu", MetricUnit::Percent, 10.0);
        history.record([&metric]);
        assert!(history.sparkline("cpu").is_empty());

        metric.value = 80.0;
        history.record([&metric]);
        assert_eq!(history.sparkline("cpu"), vec![0, 7]);
        assert_eq!(history.last_delta("cpu"), Some(70.0));
    }

    #[test]
    fn test_flat_sparkline() {
        let mut history = History::new();
        let metric = MetricSample::new("cpu", MetricUnit::Percent, 10.0);
        history.record([&metric]);
        history.record([&metric]);
        assert_eq!(history.sparkline("cpu"), vec![0, 0]);
    }
}
