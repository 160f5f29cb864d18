//! Detail overlay rendering.
//!
//! Displays a modal overlay for the selected agent: its state, the agents
//! it feeds in the workflow, and its recent feed messages.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 12;
/// Feed messages shown for the agent.
const RECENT_MESSAGES: usize = 5;

/// Render the agent detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(ref data) = app.data else {
        return;
    };
    let Some(agent) = data.agents.get(app.selected_agent_index) else {
        return;
    };

    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (area.height * 70 / 100).clamp(MIN_OVERLAY_HEIGHT, 30);
    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(format!(" {} ", agent.id))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(2), // State
        Constraint::Min(3),    // Connections and messages
        Constraint::Length(1), // Footer
    ])
    .split(inner);

    let state_line = Line::from(vec![
        Span::raw(" State: "),
        Span::styled(
            agent.state.label(),
            app.theme.agent_style(agent.state).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(state_line), chunks[0]);

    let mut lines = vec![Line::from(Span::styled(" Feeds into", app.theme.header))];
    let connected = app.connected_agents();
    if connected.is_empty() {
        lines.push(Line::from(Span::styled(
            "   (end of pipeline)",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    for target in &connected {
        lines.push(Line::from(vec![
            Span::raw("   → "),
            Span::styled(target.clone(), app.theme.connected),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Recent messages", app.theme.header)));
    let recent: Vec<_> = data
        .feed
        .iter()
        .rev()
        .filter(|m| m.source_id == agent.id)
        .take(RECENT_MESSAGES)
        .collect();
    if recent.is_empty() {
        lines.push(Line::from(Span::styled(
            "   (none)",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    for msg in recent {
        lines.push(Line::from(format!("   [{}] {}", msg.kind.label(), msg.text)));
    }
    frame.render_widget(Paragraph::new(lines), chunks[1]);

    let footer = Paragraph::new(" ↑↓:other agent  Esc:close")
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(footer, chunks[2]);
}
