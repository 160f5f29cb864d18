//! Terminal UI rendering using ratatui.
//!
//! Each tab is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`overview`]: Metrics table with sparklines and the health panel
//! - [`agents`]: Agent statuses with workflow connections highlighted
//! - [`feed`]: Agent communication feed, newest first
//! - [`quality`]: Quality checks and simulated uploads
//! - [`detail`]: Modal overlay for the selected agent
//! - [`toast`]: Notification toasts in the top-right corner
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (overview/agents/feed/quality)       │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - toast::render
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod agents;
pub mod common;
pub mod detail;
pub mod feed;
pub mod overview;
pub mod quality;
pub mod theme;
pub mod toast;

pub use theme::Theme;

use ratatui::{
    layout::{Constraint, Layout},
    Frame,
};

use crate::app::{App, View};

/// Draw one full frame: chrome, the current tab, then overlays.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Tabs
        Constraint::Min(8),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_tabs(frame, app, chunks[1]);

    match app.current_view {
        View::Overview => overview::render(frame, app, chunks[2]),
        View::Agents => agents::render(frame, app, chunks[2]),
        View::Feed => feed::render(frame, app, chunks[2]),
        View::Quality => quality::render(frame, app, chunks[2]),
    }

    common::render_status_bar(frame, app, chunks[3]);

    toast::render(frame, app, chunks[2]);

    if app.show_detail_overlay {
        detail::render_overlay(frame, app, area);
    }

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::app::tests::stub_app;

    fn render_to_string(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_every_view_renders() {
        let (mut app, _, _) = stub_app();
        app.poll_snapshot();

        for view in View::ALL {
            app.set_view(view);
            let screen = render_to_string(&app);
            assert!(screen.contains("AGENTWATCH"));
            assert!(screen.contains(view.label()));
        }
    }

    #[test]
    fn test_overview_shows_metrics_and_health() {
        let (mut app, _, _) = stub_app();
        app.poll_snapshot();
        let screen = render_to_string(&app);
        assert!(screen.contains("Orchestrator Latency"));
        assert!(screen.contains("Message Queue"));
    }

    #[test]
    fn test_toasts_and_overlays_render() {
        let (mut app, sender, _) = stub_app();
        app.poll_snapshot();

        let mut engine = crate::engine::TelemetryEngine::new(
            crate::config::EngineConfig::default(),
            crate::random::FixedRandom(0.5),
        )
        .unwrap();
        engine.notify("Report ready", crate::data::Severity::Success).unwrap();
        sender.send_replace(engine.snapshot());
        app.poll_snapshot();

        app.set_view(View::Agents);
        app.enter_detail();
        app.toggle_help();
        let screen = render_to_string(&app);
        assert!(screen.contains("Report ready"));
        assert!(screen.contains("Keyboard Shortcuts"));
    }
}
