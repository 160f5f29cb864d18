//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{AgentState, CheckState, Classification, HealthState, Severity};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning-level values.
    pub warning: Color,
    /// Color for critical-level values.
    pub critical: Color,
    /// Color for values inside their normal range.
    pub healthy: Color,
    /// Color for agents that are busy.
    pub busy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for agents connected to the selection.
    pub connected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            busy: Color::Blue,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            connected: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            busy: Color::Blue,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            connected: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a metric classification
    pub fn status_style(&self, status: Classification) -> Style {
        match status {
            Classification::Ok => Style::default().fg(self.healthy),
            Classification::Warn => Style::default().fg(self.warning),
            Classification::Critical => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
        }
    }

    pub fn health_style(&self, state: HealthState) -> Style {
        match state {
            HealthState::Ok => Style::default().fg(self.healthy),
            HealthState::Warning => Style::default().fg(self.warning),
        }
    }

    pub fn agent_style(&self, state: AgentState) -> Style {
        match state {
            AgentState::Online => Style::default().fg(self.healthy),
            AgentState::Processing => Style::default().fg(self.busy),
            AgentState::Waiting => Style::default().fg(self.warning),
        }
    }

    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Info => Style::default().fg(self.highlight),
            Severity::Success => Style::default().fg(self.healthy),
            Severity::Warning => Style::default().fg(self.warning),
            Severity::Error => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }

    pub fn check_style(&self, state: CheckState) -> Style {
        match state {
            CheckState::Critical => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
            CheckState::Warning => Style::default().fg(self.warning),
            CheckState::Fixing => Style::default().fg(self.busy).add_modifier(Modifier::ITALIC),
            CheckState::Passed => Style::default().fg(self.healthy),
        }
    }
}
