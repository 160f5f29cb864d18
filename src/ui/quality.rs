//! Quality checks and uploads.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::activity::format_file_size;
use crate::data::{CheckState, UploadState};

/// Width of the upload progress bar in cells.
const PROGRESS_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let upload_height = (data.uploads.len() as u16 + 2).clamp(3, 10);
    let chunks =
        Layout::vertical([Constraint::Min(6), Constraint::Length(upload_height)]).split(area);

    let header = Row::new(vec![Cell::from("Check"), Cell::from("State")])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = data
        .quality_checks
        .iter()
        .map(|check| {
            Row::new(vec![
                Cell::from(check.name.clone()),
                Cell::from(check.state.label()).style(app.theme.check_style(check.state)),
            ])
        })
        .collect();

    let open = data
        .quality_checks
        .iter()
        .filter(|c| c.state != CheckState::Passed)
        .count();

    let table = Table::new(rows, [Constraint::Fill(3), Constraint::Min(12)])
        .header(header)
        .block(
            Block::default()
                .title(format!(" Quality Checks ({} open) [f:fix] ", open))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_check_index));
    frame.render_stateful_widget(table, chunks[0], &mut state);

    let lines: Vec<Line> = if data.uploads.is_empty() {
        vec![Line::from(Span::styled(
            " No uploads (use --upload PATH)",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        data.uploads
            .iter()
            .map(|upload| {
                let style = match upload.state {
                    UploadState::Processing => Style::default().fg(app.theme.busy),
                    UploadState::Complete => Style::default().fg(app.theme.healthy),
                };
                Line::from(vec![
                    Span::raw(format!(" {} ", upload.name)),
                    Span::styled(
                        format!("({}) ", format_file_size(upload.size)),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                    Span::styled(progress_bar(upload.progress), style),
                    Span::styled(format!(" {:>3.0}%", upload.progress), style),
                ])
            })
            .collect()
    };

    let uploads = Paragraph::new(lines).block(
        Block::default()
            .title(" Uploads ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(uploads, chunks[1]);
}

fn progress_bar(progress: f64) -> String {
    let filled = ((progress.clamp(0.0, 100.0) / 100.0) * PROGRESS_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(PROGRESS_WIDTH - filled))
}
