use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{char_to_byte_index, App};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => app.scroll_chat_to_bottom(),
        AppEvent::Tick => app.tick_animation(),
    }

    // Pick up a finished answer whatever woke us
    app.poll_reply().await;
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.open {
        handle_open(app, key);
    } else {
        handle_closed(app, key);
    }
}

/// Only the launcher is visible
fn handle_closed(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('o') | KeyCode::Enter => app.toggle_open(),
        _ => {}
    }
}

fn handle_open(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('l') {
            app.clear_chat();
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.toggle_open(),
        KeyCode::Enter => {
            if app.input.trim().is_empty() && app.shows_shortcuts() {
                if let Some(question) = app.selected_shortcut() {
                    app.send(&question);
                }
            } else {
                app.send_input();
            }
        }
        KeyCode::Up => {
            if app.shows_shortcuts() {
                app.shortcut_nav_up();
            } else {
                app.scroll_chat_up();
            }
        }
        KeyCode::Down => {
            if app.shows_shortcuts() {
                app.shortcut_nav_down();
            } else {
                app.scroll_chat_down();
            }
        }
        KeyCode::Backspace => {
            if app.cursor > 0 {
                app.cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.cursor = (app.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.cursor = 0;
        }
        KeyCode::End => {
            app.cursor = app.input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.input, app.cursor);
            app.input.insert(byte_pos, c);
            app.cursor += 1;
        }
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_chat = app
        .chat_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !app.open || !in_chat {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if app.shows_shortcuts() {
                app.shortcut_nav_down();
            } else {
                app.scroll_chat_down_by(3);
            }
        }
        MouseEventKind::ScrollUp => {
            if app.shows_shortcuts() {
                app.shortcut_nav_up();
            } else {
                app.scroll_chat_up_by(3);
            }
        }
        _ => {}
    }
}
