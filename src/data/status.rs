//! Agent status entities and their random drift.

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// Displayed state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    Online,
    Processing,
    Waiting,
}

impl AgentState {
    /// All states, in the order used for uniform selection.
    pub const ALL: [AgentState; 3] = [AgentState::Online, AgentState::Processing, AgentState::Waiting];

    pub fn label(&self) -> &'static str {
        match self {
            AgentState::Online => "online",
            AgentState::Processing => "processing",
            AgentState::Waiting => "waiting",
        }
    }
}

/// An agent card on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntity {
    pub id: String,
    pub state: AgentState,
}

impl StatusEntity {
    pub fn new(id: impl Into<String>, state: AgentState) -> Self {
        Self {
            id: id.into(),
            state,
        }
    }

    /// Possibly reassign the state.
    ///
    /// One draw decides whether a change happens (`draw < probability`); a
    /// second draw picks the new state uniformly, which may equal the current
    /// one. Returns true if the second draw was taken.
    pub fn drift<R: RandomSource + ?Sized>(&mut self, probability: f64, rng: &mut R) -> bool {
        if rng.next_f64() >= probability {
            return false;
        }
        self.state = AgentState::ALL[rng.pick(AgentState::ALL.len())];
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedRandom, SequenceRandom};

    #[test]
    fn test_no_drift_above_probability() {
        let mut agent = StatusEntity::new("Document Intelligence", AgentState::Online);
        assert!(!agent.drift(0.10, &mut FixedRandom(0.5)));
        assert_eq!(agent.state, AgentState::Online);
    }

    #[test]
    fn test_drift_picks_uniform_state() {
        let mut agent = StatusEntity::new("Risk Assessment", AgentState::Online);
        let mut rng = SequenceRandom::new([0.05, 0.9], 0.5);
        assert!(agent.drift(0.10, &mut rng));
        assert_eq!(agent.state, AgentState::Waiting);
    }

    #[test]
    fn test_zero_probability_never_drifts() {
        let mut agent = StatusEntity::new("Cost Estimation", AgentState::Processing);
        assert!(!agent.drift(0.0, &mut FixedRandom(0.0)));
        assert_eq!(agent.state, AgentState::Processing);
    }
}
