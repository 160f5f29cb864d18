//! Communication feed rendering, newest message first.

use std::time::SystemTime;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_duration;
use crate::data::MessageKind;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let now = SystemTime::now();
    let items: Vec<ListItem> = data
        .feed
        .iter()
        .rev()
        .map(|msg| {
            let age = now
                .duration_since(msg.timestamp)
                .map(format_duration)
                .unwrap_or_else(|_| "now".to_string());
            let kind_style = match msg.kind {
                MessageKind::Update => Style::default().fg(app.theme.healthy),
                MessageKind::Query => Style::default().fg(app.theme.busy),
                MessageKind::Notification => Style::default().fg(app.theme.warning),
            };
            let source_style = if msg.is_orchestrator() {
                Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>6} ", age), Style::default().add_modifier(Modifier::DIM)),
                Span::styled(format!("{:<13}", msg.kind.label()), kind_style),
                Span::styled(msg.source_id.clone(), source_style),
                Span::raw(": "),
                Span::raw(msg.text.clone()),
            ]))
        })
        .collect();

    let title = format!(" Communication ({} messages) ", data.feed.len());
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .highlight_style(app.theme.selected);

    let mut state = ListState::default();
    if !data.feed.is_empty() {
        state.select(Some(app.feed_offset));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
