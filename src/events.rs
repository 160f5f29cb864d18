use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, View};

/// Default path for the `e` export shortcut.
pub const EXPORT_PATH: &str = "agentwatch_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Moving the cursor retargets the overlay
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        KeyCode::Char('1') => app.set_view(View::Overview),
        KeyCode::Char('2') => app.set_view(View::Agents),
        KeyCode::Char('3') => app.set_view(View::Feed),
        KeyCode::Char('4') => app.set_view(View::Quality),

        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Enter => app.enter_detail(),
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        KeyCode::Char('p') | KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Char('x') => {
            if !app.dismiss_newest() {
                app.set_status_message("No notifications".to_string());
            }
        }
        KeyCode::Char('f') => {
            if app.current_view == View::Quality {
                app.fix_selected();
            }
        }

        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('e') => {
            let export_path = std::path::PathBuf::from(EXPORT_PATH);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::stub_app;

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_help_swallows_next_key() {
        let (mut app, _, _) = stub_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_number_keys_switch_views() {
        let (mut app, _, _) = stub_app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_view, View::Feed);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Quality);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.current_view, View::Overview);
    }

    #[test]
    fn test_detail_overlay_only_on_agents() {
        let (mut app, _, _) = stub_app();
        app.poll_snapshot();
        press(&mut app, KeyCode::Enter);
        assert!(!app.show_detail_overlay);

        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Enter);
        assert!(app.show_detail_overlay);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_detail_overlay);
        assert!(app.running);
    }

    #[test]
    fn test_pause_and_fix_commands() {
        let (mut app, _, commands) = stub_app();
        app.poll_snapshot();
        press(&mut app, KeyCode::Char('p'));
        // `f` is ignored outside the Quality view
        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(
            commands.borrow().as_slice(),
            ["pause".to_string(), "fix 0".to_string()]
        );
        assert_eq!(app.get_status_message(), Some("Fixing: Compliance matrix incomplete"));
    }

    #[test]
    fn test_quit() {
        let (mut app, _, _) = stub_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
