use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::app::{App, PhaseKind};
use crate::profile::ProfileField;

/// Handle terminal events.
/// Returns true if the app should quit.
pub fn handle_events(app: &mut App) -> Result<bool> {
    // Poll for events with a timeout so the frame loop keeps animating.
    if event::poll(Duration::from_millis(100))?
        && let Event::Key(key) = event::read()?
    {
        // Only handle key press events (not release) - important for Windows
        if key.kind != KeyEventKind::Press {
            return Ok(app.should_quit());
        }

        // Handle Ctrl+C globally
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }

        match app.phase_kind() {
            PhaseKind::Splash | PhaseKind::Analyzing => handle_passive_phase(app, key),
            PhaseKind::Auth => handle_auth(app, key),
            PhaseKind::Dashboard => handle_dashboard(app, key),
            PhaseKind::Scanning => handle_scanning(app, key),
            PhaseKind::Results => handle_results(app, key),
        }
    }

    Ok(app.should_quit())
}

/// Splash and Analyzing accept no phase triggers; the analysis call is
/// not user-cancellable once issued. Quit is still honored.
fn handle_passive_phase(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('q') && app.phase_kind() == PhaseKind::Splash {
        app.request_quit();
    }
}

fn handle_auth(app: &mut App, key: KeyEvent) {
    let Some(form) = app.profile_form_mut() else {
        return;
    };

    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Backspace => form.delete_char(),
        KeyCode::Left => match form.focus() {
            ProfileField::Name => form.name.move_cursor_left(),
            ProfileField::Age => form.age.move_cursor_left(),
            ProfileField::Phone => form.phone.move_cursor_left(),
            ProfileField::Gender => form.cycle_gender(),
        },
        KeyCode::Right => match form.focus() {
            ProfileField::Name => form.name.move_cursor_right(),
            ProfileField::Age => form.age.move_cursor_right(),
            ProfileField::Phone => form.phone.move_cursor_right(),
            ProfileField::Gender => form.cycle_gender(),
        },
        KeyCode::Enter => app.submit_profile(),
        KeyCode::Char(ch) => {
            form.enter_char(ch);
            app.clear_status();
        }
        _ => {}
    }
}

fn handle_dashboard(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Char('s') | KeyCode::Enter => app.start_scan(),
        _ => {}
    }
}

fn handle_scanning(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_scan(),
        // Trigger a capture from the configured source. The grabber runs on
        // its own task; the frame pump picks up the result.
        KeyCode::Enter | KeyCode::Char(' ') => app.start_capture(),
        _ => {}
    }
}

fn handle_results(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Char('r') | KeyCode::Enter => app.reset(),
        _ => {}
    }
}
