//! Notification toasts, stacked in the top-right corner of the content area.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

const TOAST_WIDTH: u16 = 40;
const TOAST_HEIGHT: u16 = 3;
/// Toasts beyond this count are summarized in the status bar only.
const MAX_VISIBLE: usize = 4;

/// Render the newest notifications, most recent on top.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };
    if area.width < TOAST_WIDTH + 2 {
        return;
    }

    let x = area.x + area.width - TOAST_WIDTH - 1;
    let mut y = area.y + 1;

    for notification in data.notifications.iter().rev().take(MAX_VISIBLE) {
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let toast_area = Rect::new(x, y, TOAST_WIDTH, TOAST_HEIGHT);
        let style = app.theme.severity_style(notification.severity);

        let line = Line::from(vec![
            Span::styled(format!("{} ", notification.severity.icon()), style),
            Span::raw(notification.message.clone()),
        ]);
        let toast = Paragraph::new(line).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(style),
        );

        frame.render_widget(Clear, toast_area);
        frame.render_widget(toast, toast_area);
        y += TOAST_HEIGHT;
    }
}
