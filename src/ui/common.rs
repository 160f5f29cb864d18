//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::{AgentState, Classification};

/// Render the header bar with a one-line system overview.
///
/// Displays: worst classification, metric counts by classification,
/// busy agents, health warnings and the paused indicator.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let line = Line::from(vec![
            Span::styled(" AGENTWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Starting..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let count = |c: Classification| data.metrics.iter().filter(|m| m.classification == c).count();
    let ok = count(Classification::Ok);
    let warn = count(Classification::Warn);
    let crit = count(Classification::Critical);

    let worst = data
        .metrics
        .iter()
        .map(|m| m.classification)
        .max()
        .unwrap_or(Classification::Ok);

    let busy = data
        .agents
        .iter()
        .filter(|a| a.state == AgentState::Processing)
        .count();
    let health_warnings = data.health_warnings();

    let dim = Style::default().add_modifier(Modifier::DIM);
    let mut spans = vec![
        Span::styled(" ● ", app.theme.status_style(worst)),
        Span::styled("AGENTWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(ok.to_string(), Style::default().fg(app.theme.healthy)),
        Span::raw(" ok "),
        if warn > 0 {
            Span::styled(warn.to_string(), app.theme.status_style(Classification::Warn))
        } else {
            Span::styled("0", dim)
        },
        Span::raw(" warn "),
        if crit > 0 {
            Span::styled(crit.to_string(), app.theme.status_style(Classification::Critical))
        } else {
            Span::styled("0", dim)
        },
        Span::raw(" crit │ "),
        Span::styled(
            format!("{}/{}", busy, data.agents.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" agents busy │ "),
    ];

    if health_warnings > 0 {
        spans.push(Span::styled(
            format!("{} health warnings", health_warnings),
            Style::default().fg(app.theme.warning),
        ));
    } else {
        spans.push(Span::styled("all systems ok", Style::default().fg(app.theme.healthy)));
    }

    if data.paused {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            "PAUSED",
            Style::default().fg(app.theme.warning).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .map(|v| Line::from(format!(" {}:{} ", v.index() + 1, v.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Temporary status messages take precedence over the control hints.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref data) = app.data {
        let controls = match app.current_view {
            View::Overview => "Tab:switch p:pause x:dismiss e:export ?:help q:quit",
            View::Agents => "↑↓:select Enter:detail p:pause ?:help q:quit",
            View::Feed => "↑↓:scroll p:pause ?:help q:quit",
            View::Quality => "↑↓:select f:fix p:pause ?:help q:quit",
        };
        format!(
            " {} | tick {} | {} notifications | {}",
            app.current_view.label(),
            data.tick_count,
            data.notifications.len(),
            controls,
        )
    } else {
        " Starting... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(title, Style::default().add_modifier(Modifier::BOLD))])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  Tab/1-4     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Agent detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Actions"),
        Line::from("  p         Pause/resume updates"),
        Line::from("  x         Dismiss newest notification"),
        Line::from("  f         Auto-fix selected check"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 21u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
