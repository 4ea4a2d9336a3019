use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use quickprompt_core::credential::mask_secret;
use quickprompt_core::request::{COMPLETION_MODEL, MAX_TEMPERATURE};
use crate::app::{App, Focus, InputMode, MAX_MAX_TOKENS};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);

    let [settings_area, prompt_area, status_area, output_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Percentage(35),
        Constraint::Length(1),
        Constraint::Min(3),
    ])
    .areas(body_area);

    render_settings_row(app, frame, settings_area);
    render_prompt(app, frame, prompt_area);
    render_status(app, frame, status_area);
    render_output(app, frame, output_area);
    render_footer(app, frame, footer_area);

    // Render popups (error on top of about)
    if let Some(message) = &app.error_popup {
        render_error_popup(message, frame, area);
    } else if app.show_about {
        render_about_popup(frame, area);
    }
}

fn border_style(app: &App, focus: Focus) -> Style {
    if app.focus != focus {
        Style::default().fg(Color::DarkGray)
    } else if app.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" quickprompt ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!("[{}]", COMPLETION_MODEL), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_settings_row(app: &App, frame: &mut Frame, area: Rect) {
    let [key_area, temp_area, tokens_area] = Layout::horizontal([
        Constraint::Min(20),
        Constraint::Length(24),
        Constraint::Length(22),
    ])
    .areas(area);

    // API key, masked; well-formedness shown in the title like a form warning
    let credential = app.credential();
    let key_title = if credential.is_well_formed() {
        Line::from(" OpenAI API Key ")
    } else {
        Line::from(vec![
            Span::raw(" OpenAI API Key "),
            Span::styled("(needs sk-...) ", Style::default().fg(Color::Yellow)),
        ])
    };
    let key_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, Focus::ApiKey))
        .title(key_title);
    let key_inner = key_block.inner(key_area);
    let key_text = Paragraph::new(mask_secret(&app.api_key.text))
        .style(Style::default().fg(Color::Cyan));
    frame.render_widget(key_text.block(key_block), key_area);

    if app.focus == Focus::ApiKey && app.input_mode == InputMode::Editing {
        // Masked text may be shorter than the real key; park the cursor at the end
        let shown = mask_secret(&app.api_key.text).chars().count() as u16;
        let x = key_inner.x + shown.min(key_inner.width.saturating_sub(1));
        frame.set_cursor_position((x, key_inner.y));
    }

    let temp_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, Focus::Temperature))
        .title(" Temperature ");
    frame.render_widget(
        Paragraph::new(value_bar(
            app.temperature / MAX_TEMPERATURE,
            format!("{:.1}", app.temperature),
        ))
        .block(temp_block),
        temp_area,
    );

    let tokens_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, Focus::MaxTokens))
        .title(" Max Tokens ");
    frame.render_widget(
        Paragraph::new(value_bar(
            app.max_tokens as f32 / MAX_MAX_TOKENS as f32,
            app.max_tokens.to_string(),
        ))
        .block(tokens_block),
        tokens_area,
    );
}

/// `◀ ████░░░░ 0.7 ▶` style slider line
fn value_bar(ratio: f32, label: String) -> Line<'static> {
    const WIDTH: usize = 8;
    let filled = ((ratio.clamp(0.0, 1.0) * WIDTH as f32).round() as usize).min(WIDTH);
    Line::from(vec![
        Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
        Span::styled("█".repeat(filled), Style::default().fg(Color::Cyan)),
        Span::styled("░".repeat(WIDTH - filled), Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {} ", label)),
        Span::styled("▶", Style::default().fg(Color::DarkGray)),
    ])
}

fn render_prompt(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, Focus::Prompt))
        .title(" Enter your prompt ");
    let inner = block.inner(area);

    let text = if app.prompt.text.is_empty() && app.input_mode == InputMode::Normal {
        Text::from(Span::styled(
            "Press Enter to type a prompt...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(app.prompt.text.as_str())
    };

    // Keep the cursor line visible in long prompts
    let (line, col) = app.prompt.cursor_line_col();
    let scroll = (line as u16).saturating_sub(inner.height.saturating_sub(1));

    frame.render_widget(Paragraph::new(text).block(block).scroll((scroll, 0)), area);

    if app.focus == Focus::Prompt && app.input_mode == InputMode::Editing {
        let x = inner.x + (col as u16).min(inner.width.saturating_sub(1));
        let y = inner.y + (line as u16 - scroll).min(inner.height.saturating_sub(1));
        frame.set_cursor_position((x, y));
    }
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let line = if app.is_loading() {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        Line::from(vec![
            Span::styled(" ⏳ ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}{}", app.status.trim_end_matches('.'), dots),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
            ),
        ])
    } else if app.status == "Error occurred" {
        Line::from(Span::styled(format!(" {}", app.status), Style::default().fg(Color::Red)))
    } else {
        Line::from(Span::styled(format!(" {}", app.status), Style::default().fg(Color::Green)))
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn render_output(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, Focus::Output))
        .title(" AI Response ");

    let text = if app.output.is_empty() {
        Text::from(Span::styled(
            "The response will appear here.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(app.output.as_str())
    };

    let output = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.output_scroll, 0));

    frame.render_widget(output, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " EDIT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = vec![Span::styled(mode_text, mode_style)];
    let pairs: &[(&str, &str)] = match (app.input_mode, app.focus) {
        (InputMode::Editing, Focus::Prompt) => &[
            (" Esc ", " done "),
            (" Enter ", " newline "),
            (" F5 ", " generate "),
        ],
        (InputMode::Editing, _) => &[
            (" Esc ", " done "),
            (" Ctrl+U ", " clear "),
            (" F5 ", " generate "),
        ],
        (InputMode::Normal, Focus::Temperature | Focus::MaxTokens) => &[
            (" h/l ", " adjust "),
            (" Tab ", " focus "),
            (" g ", " generate "),
            (" s ", " save defaults "),
            (" q ", " quit "),
        ],
        (InputMode::Normal, _) => &[
            (" Enter ", " edit "),
            (" Tab ", " focus "),
            (" g ", " generate "),
            (" j/k ", " scroll "),
            (" x/X ", " clear in/out "),
            (" ? ", " about "),
            (" q ", " quit "),
        ],
    };
    for (key, label) in pairs {
        hints.push(Span::styled(*key, key_style));
        hints.push(Span::styled(*label, label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

fn render_error_popup(message: &str, frame: &mut Frame, area: Rect) {
    let popup_area = centered_popup(area, 60, 8);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Error ");

    let text = Text::from(vec![
        Line::from(message.to_string()),
        Line::default(),
        Line::from(Span::styled(
            "Press Enter or Esc to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ]);

    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        popup_area,
    );
}

fn render_about_popup(frame: &mut Frame, area: Rect) {
    let popup_area = centered_popup(area, 52, 9);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" About ");

    let text = Text::from(vec![
        Line::from(Span::styled("quickprompt", Style::default().bold())),
        Line::default(),
        Line::from("A simple terminal interface for the OpenAI"),
        Line::from(format!("completions API ({}).", COMPLETION_MODEL)),
        Line::default(),
        Line::from(Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        )),
    ]);

    frame.render_widget(Paragraph::new(text).block(block), popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(app, f)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_key_is_masked_on_screen() {
        let mut app = test_app();
        app.api_key = crate::app::TextField::new("sk-verysecretkey9876");
        let screen = draw(&mut app);
        assert!(!screen.contains("verysecret"));
        assert!(screen.contains("9876"));
    }

    #[test]
    fn test_error_popup_rendered() {
        let mut app = test_app();
        app.error_popup = Some("rate limited".to_string());
        let screen = draw(&mut app);
        assert!(screen.contains("Error"));
        assert!(screen.contains("rate limited"));
    }

    #[test]
    fn test_output_and_status_rendered() {
        let mut app = test_app();
        app.output = "Practice every day".to_string();
        let screen = draw(&mut app);
        assert!(screen.contains("Practice every day"));
        assert!(screen.contains("Ready"));
        assert!(screen.contains("0.7"));
        assert!(screen.contains("500"));
    }
}
