// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # agentwatch
//!
//! A simulated telemetry engine and terminal dashboard for AI agent activity.
//!
//! The engine keeps a small set of displayed entities (metric samples, agent
//! statuses, health indicators, a message feed and notifications) alive by
//! mutating them on timers with clamped random walks. Nothing is measured:
//! the values exist to give a dashboard something plausible to show.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│ snapshot │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (watch)  │    │(render) │    │         │ │
//! │  └────┬────┘    └────▲─────┘    └─────────┘    └─────────┘ │
//! │       │ commands     │ publish                              │
//! │       ▼              │                                      │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐                 │
//! │  │ driver  │───▶│  engine  │───▶│  data   │                 │
//! │  │ (timers)│    │(registry)│    │ (pure)  │                 │
//! │  └─────────┘    └──────────┘    └─────────┘                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: Pure state transitions - perturbation, clamping,
//!   classification, bounded feed, TTL notifications
//! - **[`engine`]**: [`TelemetryEngine`], the registry owning every entity
//! - **[`driver`]**: Fast, slow and feed timers with pause/resume and
//!   notification expiry
//! - **[`random`]**: Injectable [`RandomSource`] so tests can script draws
//! - **[`config`]**: [`EngineConfig`] with defaults, validation and TOML loading
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Run the dashboard with default timers
//! agentwatch
//!
//! # Faster timers and a reproducible seed
//! agentwatch --fast-interval 1s --seed 42
//!
//! # Headless: run 100 fast ticks and export the result
//! agentwatch --export state.json --ticks 100
//! ```
//!
//! ### Driving the engine by hand
//!
//! ```
//! use agentwatch::{EngineConfig, Severity, TelemetryEngine};
//!
//! let config = EngineConfig { seed: Some(7), ..Default::default() };
//! let mut engine = TelemetryEngine::from_config(config).unwrap();
//! engine.tick();
//! engine.notify("Report ready", Severity::Success).unwrap();
//! assert_eq!(engine.notifications().len(), 1);
//! ```
//!
//! ### With the timer driver
//!
//! ```no_run
//! use agentwatch::{Driver, EngineConfig, TelemetryEngine};
//!
//! # tokio_test::block_on(async {
//! let engine = TelemetryEngine::from_config(EngineConfig::default()).unwrap();
//! let driver = Driver::spawn(engine, &tokio::runtime::Handle::current());
//! let mut snapshots = driver.subscribe();
//! snapshots.changed().await.unwrap();
//! println!("{} metrics", snapshots.borrow().metrics.len());
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod driver;
pub mod engine;
pub mod error;
pub mod events;
pub mod random;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::{EngineConfig, MetricSeed, Scenario};
pub use data::{
    AgentState, Classification, FeedMessage, MessageKind, MetricSample, MetricUnit,
    NotificationId, Severity, StatusEntity, UploadCandidate,
};
pub use driver::{Driver, DriverHandle, RunState};
pub use engine::{EngineSnapshot, TelemetryEngine};
pub use error::{EngineError, Result};
pub use random::{FixedRandom, RandomSource, SeededRandom, SequenceRandom};
