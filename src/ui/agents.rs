//! Agents view rendering.
//!
//! Lists every agent with its current state. Agents downstream of the
//! selected one in the workflow map are highlighted.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let chunks = Layout::horizontal([Constraint::Fill(2), Constraint::Fill(1)]).split(area);
    let connected = app.connected_agents();

    let header = Row::new(vec![Cell::from("Agent"), Cell::from("State"), Cell::from("")])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = data
        .agents
        .iter()
        .enumerate()
        .map(|(index, agent)| {
            if !app.stage_revealed(index) {
                return Row::new(vec![Cell::from("…")]);
            }
            let is_connected = connected.iter().any(|c| c == &agent.id);
            let name_style = if is_connected {
                app.theme.connected
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(agent.id.clone()).style(name_style),
                Cell::from(agent.state.label()).style(app.theme.agent_style(agent.state)),
                Cell::from(if is_connected { "◀ next" } else { "" }).style(name_style),
            ])
        })
        .collect();

    let widths = [Constraint::Fill(3), Constraint::Min(12), Constraint::Min(7)];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Agents ({}) ", data.agents.len()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_agent_index));
    frame.render_stateful_widget(table, chunks[0], &mut state);

    render_connections(frame, app, &connected, chunks[1]);
}

fn render_connections(frame: &mut Frame, app: &App, connected: &[String], area: Rect) {
    let mut lines = Vec::new();
    match app.selected_agent() {
        Some(agent) => {
            lines.push(Line::from(Span::styled(
                format!(" {}", agent),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            if connected.is_empty() {
                lines.push(Line::from(Span::styled(
                    " No downstream agents",
                    Style::default().add_modifier(Modifier::DIM),
                )));
            }
            for target in connected {
                lines.push(Line::from(vec![
                    Span::raw(" → "),
                    Span::styled(target.clone(), app.theme.connected),
                ]));
            }
        }
        None => lines.push(Line::from(" No agents")),
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Workflow ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(paragraph, area);
}
