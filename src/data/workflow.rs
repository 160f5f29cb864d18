//! Workflow connection map between agents.
//!
//! The map is illustrative sample data loaded from configuration. It drives
//! highlighting in the Agents view and carries no dependency semantics.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delay applied per stage index when stages are first revealed.
pub const STAGE_REVEAL_STEP: Duration = Duration::from_millis(100);

/// Downstream connections between named agents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowGraph {
    /// Agent name -> agents it hands work to.
    pub edges: BTreeMap<String, Vec<String>>,
}

impl WorkflowGraph {
    pub fn new(edges: BTreeMap<String, Vec<String>>) -> Self {
        Self { edges }
    }

    /// The illustrative tender-analysis pipeline.
    pub fn sample() -> Self {
        let pairs: [(&str, &[&str]); 6] = [
            ("Document Intelligence", &["Requirements Engineering"]),
            (
                "Requirements Engineering",
                &["Solution Architecture", "Risk Assessment"],
            ),
            ("Solution Architecture", &["Project Planning"]),
            ("Risk Assessment", &["Cost Estimation"]),
            ("Project Planning", &["Proposal Generation"]),
            ("Proposal Generation", &["Quality Assurance"]),
        ];

        let edges = pairs
            .iter()
            .map(|(from, to)| {
                (
                    from.to_string(),
                    to.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect();
        Self { edges }
    }

    /// Agents directly downstream of `agent`.
    ///
    /// Matching is by substring so that "Risk Assessment Agent" also
    /// resolves connections declared for "Risk Assessment".
    pub fn connections_of<'a>(&'a self, agent: &str, known: &'a [String]) -> Vec<&'a str> {
        let Some(targets) = self.edges.get(agent) else {
            return Vec::new();
        };

        let mut result: Vec<&str> = Vec::new();
        for target in targets {
            for candidate in known {
                if candidate.contains(target.as_str()) && !result.contains(&candidate.as_str()) {
                    result.push(candidate.as_str());
                }
            }
        }
        result
    }

    /// Every agent mentioned in the graph, sorted alphabetically.
    pub fn agents(&self) -> Vec<String> {
        let mut names: BTreeSet<String> = BTreeSet::new();
        for (from, to) in &self.edges {
            names.insert(from.clone());
            names.extend(to.iter().cloned());
        }
        names.into_iter().collect()
    }
}

/// Presentation delay before stage `index` becomes visible.
pub fn stage_reveal_delay(index: usize) -> Duration {
    STAGE_REVEAL_STEP * index as u32
}
