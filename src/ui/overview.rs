//! Overview rendering.
//!
//! Displays every metric with its classification and a sparkline of
//! recent values, next to the system health panel.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::MetricUnit;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the Overview tab.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let chunks = Layout::horizontal([Constraint::Fill(3), Constraint::Fill(1)]).split(area);

    let header = Row::new(vec![
        Cell::from("Metric"),
        Cell::from("Value"),
        Cell::from("Δ"),
        Cell::from("Trend"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = data
        .metrics
        .iter()
        .map(|m| {
            let status_style = app.theme.status_style(m.classification);
            let sparkline = render_sparkline(&app.history.sparkline(&m.name));
            let delta = app
                .history
                .last_delta(&m.name)
                .map(|d| format_delta(d, m.unit))
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(m.name.clone()),
                Cell::from(m.display_value()).style(status_style),
                Cell::from(delta),
                Cell::from(sparkline),
                Cell::from(m.classification.symbol()).style(status_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Min(12),
        Constraint::Min(6),
    ];

    let title = format!(
        " Metrics ({}) [{}/{}] ",
        data.metrics.len(),
        app.selected_metric_index + 1,
        data.metrics.len().max(1)
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_metric_index));
    frame.render_stateful_widget(table, chunks[0], &mut state);

    render_health(frame, app, chunks[1]);
}

fn render_health(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let items: Vec<ListItem> = data
        .health
        .iter()
        .map(|h| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", h.state.symbol()), app.theme.health_style(h.state)),
                Span::raw(h.name.clone()),
            ]))
        })
        .collect();

    let title = format!(" Health (check #{}) ", data.health_tick_count);
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(list, area);
}

/// Render sparkline levels as block characters.
fn render_sparkline(values: &[u8]) -> String {
    values
        .iter()
        .rev()
        .take(12)
        .rev()
        .map(|&v| SPARKLINE_CHARS[v.min(7) as usize])
        .collect()
}

fn format_delta(delta: f64, unit: MetricUnit) -> String {
    if delta.abs() < f64::EPSILON {
        return "=".to_string();
    }
    let sign = if delta > 0.0 { "+" } else { "" };
    match unit {
        MetricUnit::Seconds => format!("{}{:.1}{}", sign, delta, unit.suffix()),
        _ => format!("{}{}{}", sign, delta.round(), unit.suffix()),
    }
}
