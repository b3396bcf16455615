//! Keyboard handling for the dashboard.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::ui::app::{App, RunRequest};

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Windows terminals also report releases.
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('q') => app.should_quit = true,

        // Tab navigation
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_tab(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_tab(),
        KeyCode::Char(c @ '1'..='4') => app.goto_tab(c as u8 - b'0'),

        // Selectors
        KeyCode::Char('s') => app.next_site(),
        KeyCode::Char('S') => app.previous_site(),
        KeyCode::Char('p') => app.next_period(),
        KeyCode::Enter | KeyCode::Char('r') => app.request(RunRequest::Run),
        KeyCode::Char('f') => app.request(RunRequest::Refetch),
        KeyCode::Char('C') => app.request(RunRequest::RefetchAll),

        // Table scrolling
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        _ => {}
    }
}

/// Poll for events with a timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
