//! Bounded agent communication feed.

use std::collections::VecDeque;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// Default number of messages retained by the feed.
pub const DEFAULT_FEED_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Update,
    Query,
    Notification,
}

impl MessageKind {
    pub fn label(&self) -> &'static str {
        match self {
            MessageKind::Update => "UPDATE",
            MessageKind::Query => "QUERY",
            MessageKind::Notification => "NOTIFICATION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedMessage {
    pub source_id: String,
    pub kind: MessageKind,
    pub text: String,
    pub timestamp: SystemTime,
}

impl FeedMessage {
    pub fn new(source_id: impl Into<String>, kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            kind,
            text: text.into(),
            timestamp: SystemTime::now(),
        }
    }

    /// Orchestrator messages are rendered differently from analysis agents.
    pub fn is_orchestrator(&self) -> bool {
        self.source_id.to_lowercase().contains("orchestrator")
    }

    /// Build one of the canned chatter messages from two draws.
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        match rng.pick(3) {
            0 => {
                let page = 1 + rng.pick(50);
                Self::new(
                    "Document Intelligence",
                    MessageKind::Update,
                    format!("Processing document page {}", page),
                )
            }
            1 => {
                let requirement = rng.pick(100);
                Self::new(
                    "Requirements Engineering",
                    MessageKind::Query,
                    format!("Clarification needed on requirement REQ-{}", requirement),
                )
            }
            _ => Self::new(
                "Agent Orchestrator",
                MessageKind::Notification,
                "Workflow checkpoint reached",
            ),
        }
    }
}

/// FIFO message queue that evicts the oldest entry on overflow.
#[derive(Debug, Clone)]
pub struct Feed {
    messages: VecDeque<FeedMessage>,
    capacity: usize,
}

impl Default for Feed {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_FEED_CAPACITY)
    }
}

impl Feed {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a message, evicting from the front while over capacity.
    ///
    /// Returns the evicted message, if any.
    pub fn push(&mut self, message: FeedMessage) -> Option<FeedMessage> {
        self.messages.push_back(message);
        let mut evicted = None;
        while self.messages.len() > self.capacity {
            evicted = self.messages.pop_front();
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Messages oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &FeedMessage> {
        self.messages.iter()
    }

    pub fn to_vec(&self) -> Vec<FeedMessage> {
        self.messages.iter().cloned().collect()
    }
}
