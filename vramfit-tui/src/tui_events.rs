use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use std::time::Duration;

use crate::tui_app::App;

/// Poll for and handle events. Returns true if an event was processed.
pub fn handle_events(app: &mut App) -> std::io::Result<bool> {
    if event::poll(Duration::from_millis(50))?
        && let Event::Key(key) = event::read()?
    {
        // Only handle Press events (ignore Release on some platforms)
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }
        handle_key(app, key);
        return Ok(true);
    }
    Ok(false)
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        // Field navigation
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Tab => app.next_field(),
        KeyCode::BackTab => app.previous_field(),
        KeyCode::Home | KeyCode::Char('g') => app.first_field(),
        KeyCode::End | KeyCode::Char('G') => app.last_field(),

        // Value adjustment
        KeyCode::Left | KeyCode::Char('h') => app.adjust(-1),
        KeyCode::Right | KeyCode::Char('l') => app.adjust(1),
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_current(),

        // Theme
        KeyCode::Char('t') => app.toggle_theme(),

        _ => {}
    }
}
