//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Which keys mean what depends
//! on the innermost open overlay: the search prompt takes every key while it
//! is open, then the settings panel, then the drawer, then the list.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in the handler for the right layer.
//! 3. Update the help text in [`crate::ui`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;
use crate::nav::Category;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.search_prompt.is_some() {
        return handle_search_key(app, key.code);
    }

    match key.code {
        KeyCode::Char('q') => return app.quit(),
        KeyCode::Esc | KeyCode::Backspace => return app.back(),
        _ => {}
    }

    if app.shell.settings_open {
        handle_settings_key(app, key.code);
    } else if app.shell.drawer_open {
        handle_drawer_key(app, key.code);
    } else {
        handle_list_key(app, key.code);
    }
}

fn handle_search_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => app.submit_search(),
        KeyCode::Esc => app.cancel_search_prompt(),
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('o') => app.cycle_order(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.grow_page(),
        KeyCode::Char('-') => app.shrink_page(),
        _ => {}
    }
}

fn handle_drawer_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Down | KeyCode::Char('j') => app.shell.cursor_down(),
        KeyCode::Up | KeyCode::Char('k') => app.shell.cursor_up(),
        KeyCode::Enter => app.select_from_drawer(),
        KeyCode::Tab | KeyCode::Char('m') => app.shell.toggle_drawer(),
        code => select_by_number(app, code),
    }
}

fn handle_list_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Tab | KeyCode::Char('m') => app.shell.toggle_drawer(),
        KeyCode::Char('/') => app.open_search_prompt(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Enter => app.show_link(),
        code => select_by_number(app, code),
    }
}

/// `1`-`9` pick drawer entries directly.
fn select_by_number(app: &mut App, code: KeyCode) {
    if let KeyCode::Char(c) = code {
        if let Some(category) = c
            .to_digit(10)
            .and_then(|d| (d as usize).checked_sub(1))
            .and_then(Category::from_index)
        {
            app.select(category);
        }
    }
}
