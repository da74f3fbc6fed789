use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, AppMode, DialogKind};

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.mode.clone() {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Help => handle_help_mode(app, key),
        AppMode::Dialog(kind) if kind.has_input() => handle_input_dialog(app, key),
        AppMode::Dialog(DialogKind::Error { .. }) => match key.code {
            KeyCode::Enter | KeyCode::Esc => app.close_dialog(),
            _ => {}
        },
        AppMode::Dialog(_) => handle_confirm_dialog(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.activate_selected(),
        KeyCode::Char('h') | KeyCode::Left => app.collapse_selected(),
        KeyCode::Char('b') => app.toggle_sidebar(),

        KeyCode::Char('n') | KeyCode::PageDown => app.next_page(),
        KeyCode::Char('p') | KeyCode::PageUp => app.prev_page(),

        KeyCode::Char('N') => app.begin_new_folder(true),
        KeyCode::Char('A') => app.begin_new_folder(false),
        KeyCode::Char('U') => app.begin_upload(true),
        KeyCode::Char('u') => app.begin_upload(false),
        KeyCode::Char('r') => app.begin_rename(),
        KeyCode::Char('d') => app.begin_delete(),
        KeyCode::Char('v') => app.toggle_visibility(),
        KeyCode::Char('c') => app.commit(),
        KeyCode::Char('X') => app.begin_discard(),

        KeyCode::Char('+') => app.toggle_like(),
        KeyCode::Char('-') => app.toggle_dislike(),
        KeyCode::Char(c @ '1'..='5') => app.rate(c as u8 - b'0'),
        _ => {}
    }
}

fn handle_help_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => app.toggle_help(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_help(true),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_help(false),
        _ => {}
    }
}

fn handle_input_dialog(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => app.confirm_dialog(),
        KeyCode::Backspace => app.dialog_delete_char(),
        KeyCode::Left => app.dialog_move_cursor_left(),
        KeyCode::Right => app.dialog_move_cursor_right(),
        KeyCode::Home => app.dialog_cursor_home(),
        KeyCode::End => app.dialog_cursor_end(),
        KeyCode::Char(c) => app.dialog_input_char(c),
        _ => {}
    }
}

fn handle_confirm_dialog(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_dialog(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_dialog(),
        _ => {}
    }
}
