//! Pure state-transition types for the simulated dashboard.
//!
//! Nothing in this module schedules work or renders anything. Each type
//! exposes small mutation functions that take their randomness as a
//! parameter so they can be tested with scripted draws.
//!
//! ## Submodules
//!
//! - [`metric`]: Metric samples, clamped random walk and ok/warn/critical classification
//! - [`status`]: Agent status entities and their random drift
//! - [`health`]: System health indicators
//! - [`feed`]: Bounded communication feed
//! - [`notification`]: TTL notifications with idempotent removal
//! - [`activity`]: Simulated uploads and quality-check auto-fixes
//! - [`workflow`]: Illustrative agent connection map
//! - [`history`]: Per-metric history for sparklines
//! - [`duration`]: Parsing and formatting of interval strings (e.g., "5s", "500ms")

pub mod activity;
pub mod duration;
pub mod feed;
pub mod health;
pub mod history;
pub mod metric;
pub mod notification;
pub mod status;
pub mod workflow;

pub use activity::{CheckState, QualityCheck, Upload, UploadCandidate, UploadState};
pub use feed::{Feed, FeedMessage, MessageKind};
pub use health::{HealthIndicator, HealthState};
pub use history::History;
pub use metric::{Classification, MetricSample, MetricUnit, Thresholds};
pub use notification::{Notification, NotificationCenter, NotificationId, Severity};
pub use status::{AgentState, StatusEntity};
pub use workflow::WorkflowGraph;
