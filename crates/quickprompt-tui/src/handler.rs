use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::{App, Focus, InputMode};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Paste(text) => handle_paste(app, &text),
        AppEvent::Resize => {}
        AppEvent::Tick => {
            app.tick_animation();
            app.poll_request().await;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Popups swallow everything until dismissed
    if app.has_popup() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.close_popup();
        }
        return;
    }

    // Generate from anywhere, including while typing
    if key.code == KeyCode::F(5) {
        app.submit();
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.prev(),

        KeyCode::Enter | KeyCode::Char('i') if app.focus.is_text() => {
            app.input_mode = InputMode::Editing;
        }

        // Settings
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('+') => adjust_focused(app, 1),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('-') => adjust_focused(app, -1),

        // Output scrolling
        KeyCode::Char('j') | KeyCode::Down => app.scroll_output_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_output_up(1),
        KeyCode::PageDown => app.scroll_output_down(10),
        KeyCode::PageUp => app.scroll_output_up(10),

        // Actions
        KeyCode::Char('g') => app.submit(),
        KeyCode::Char('x') => app.clear_input(),
        KeyCode::Char('X') => app.clear_output(),
        KeyCode::Char('s') => app.save_defaults(),
        KeyCode::Char('?') => app.show_about = true,

        _ => {}
    }
}

fn adjust_focused(app: &mut App, steps: i32) {
    match app.focus {
        Focus::Temperature => app.adjust_temperature(steps),
        Focus::MaxTokens => app.adjust_max_tokens(steps),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    let focus = app.focus;
    let Some(field) = app.focused_field() else {
        app.input_mode = InputMode::Normal;
        return;
    };

    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter if focus == Focus::Prompt => field.insert_char('\n'),
        KeyCode::Enter => {
            // Key is a single line: Enter moves on to the prompt
            app.input_mode = InputMode::Normal;
            app.focus = Focus::Prompt;
        }
        KeyCode::Tab => {
            app.input_mode = InputMode::Normal;
            app.focus = focus.next();
        }
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left => field.left(),
        KeyCode::Right => field.right(),
        KeyCode::Home => field.home(),
        KeyCode::End => field.end(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => field.clear(),
        KeyCode::Char(c) => field.insert_char(c),
        _ => {}
    }
}

fn handle_paste(app: &mut App, text: &str) {
    if app.has_popup() {
        return;
    }
    let focus = app.focus;
    if let Some(field) = app.focused_field() {
        if focus == Focus::ApiKey {
            // Keys are single-line; drop stray newlines from the clipboard
            field.insert_str(text.trim());
        } else {
            field.insert_str(&text.replace("\r\n", "\n"));
        }
    }
}
