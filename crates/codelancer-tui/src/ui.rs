use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::app::App;
use codelancer_core::Sender;

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

    if app.open {
        render_widget(app, frame, widget_area(body_area));
    } else {
        app.chat_area = None;
        render_launcher(frame, body_area);
    }

    render_footer(app, frame, footer_area);
}

/// Bottom-right panel, like the floating widget on the site
fn widget_area(body: Rect) -> Rect {
    let width = 60.min(body.width);
    let height = (body.height * 9 / 10).max(12).min(body.height);
    Rect::new(
        body.x + body.width - width,
        body.y + body.height - height,
        width,
        height,
    )
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" thecodelancer ", Style::default().fg(Color::Cyan).bold()),
        Span::styled("Your AI Companion", Style::default().fg(Color::White)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = if app.open {
        (" CHAT ", Style::default().bg(Color::Yellow).fg(Color::Black))
    } else {
        (" CLOSED ", Style::default().bg(Color::Blue).fg(Color::White))
    };

    let hints = if !app.open {
        "o/Enter: open  q: quit"
    } else if app.shows_shortcuts() {
        "↑↓: pick question  Enter: send  Ctrl-L: clear  Esc: close  Ctrl-C: quit"
    } else {
        "Enter: send  ↑↓: scroll  Ctrl-L: clear  Esc: close  Ctrl-C: quit"
    };

    let footer = Line::from(vec![
        Span::styled(mode_text, mode_style.add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(footer), area);
}

fn render_launcher(frame: &mut Frame, area: Rect) {
    let label = Span::raw(" 💬 Chat with us ");
    // Display width, the emoji takes two cells
    let width = (label.width() as u16 + 2).min(area.width);
    let launcher_area = Rect::new(
        area.x + area.width - width,
        area.y + area.height.saturating_sub(3),
        width,
        3.min(area.height),
    );

    let launcher = Paragraph::new(label)
        .style(Style::default().fg(Color::White).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        );
    frame.render_widget(launcher, launcher_area);
}

fn render_widget(app: &mut App, frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);

    let shortcuts_height = if app.shows_shortcuts() {
        (app.bot.responder().faqs().len().min(8) + 2) as u16 // +2 for borders
    } else {
        0
    };

    let [chat_area, shortcuts_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(shortcuts_height),
        Constraint::Length(3),
    ])
    .areas(area);

    // Store area for mouse hit-testing
    app.chat_area = Some(chat_area);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    render_transcript(app, frame, chat_area);

    if shortcuts_height > 0 && shortcuts_area.height > 0 {
        render_shortcuts(app, frame, shortcuts_area);
    }

    render_input(app, frame, input_area);
}

fn render_transcript(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" How can I assist you today? ");

    let mut lines: Vec<Line> = Vec::new();

    for msg in app.bot.messages() {
        match msg.sender {
            Sender::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                for line in msg.text.lines() {
                    lines.push(Line::from(line));
                }
            }
            Sender::Bot => {
                lines.push(Line::from(Span::styled(
                    "Bot:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                for line in msg.text.lines() {
                    lines.push(Line::from(line));
                }
            }
        }
        lines.push(Line::default());
    }

    if app.bot.is_awaiting() {
        lines.push(Line::from(Span::styled(
            "Bot:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Typing{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_shortcuts(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Popular Questions ");

    let items: Vec<ListItem> = app
        .shortcuts()
        .into_iter()
        .map(|q| ListItem::new(format!(" {} ", q)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Magenta)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.shortcut_state);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.bot.is_awaiting() {
            Color::DarkGray
        } else {
            Color::Yellow
        }));

    let text = if app.input.is_empty() {
        Span::styled("Ask me anything...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.input.as_str())
    };

    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);

    // Show cursor
    let cursor_x = app.cursor.min(inner.width.saturating_sub(1) as usize) as u16;
    frame.set_cursor_position((inner.x + cursor_x, inner.y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use codelancer_core::{FallbackResponder, FaqList, Responder};
    use ratatui::{backend::TestBackend, Terminal};

    fn app() -> App {
        App::new(Responder::new(FaqList::default(), FallbackResponder::disabled()))
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_closed_shows_launcher() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = app();
        terminal.draw(|f| render(&mut app, f)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Chat with us"));
        assert!(app.chat_area.is_none());
    }

    #[test]
    fn test_launcher_label_fits_inside_border() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = app();
        terminal.draw(|f| render(&mut app, f)).unwrap();

        // Label row sits just above the bottom border, above the footer
        let text = screen_text(&terminal);
        let rows: Vec<&str> = text.lines().collect();
        assert!(rows[rows.len() - 3].ends_with("Chat with us │"));
    }

    #[test]
    fn test_multiline_user_message_splits_into_lines() {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let mut app = app();
        app.open = true;
        app.bot.submit("first line\nsecond line");
        terminal.draw(|f| render(&mut app, f)).unwrap();

        let text = screen_text(&terminal);
        let rows: Vec<&str> = text.lines().collect();
        let first = rows.iter().position(|r| r.contains("first line")).unwrap();
        assert!(rows[first + 1].contains("second line"));
        assert!(!rows[first].contains("second line"));
    }

    #[test]
    fn test_open_shows_greeting_and_shortcuts() {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let mut app = app();
        app.open = true;
        terminal.draw(|f| render(&mut app, f)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Popular Questions"));
        assert!(text.contains("What services do you offer?"));
        assert!(text.contains("Ask me anything..."));
        assert!(app.chat_area.is_some());
    }

    #[tokio::test]
    async fn test_awaiting_shows_typing() {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let mut app = app();
        app.open = true;
        app.send("Where are you located?");
        terminal.draw(|f| render(&mut app, f)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Typing."));
        assert!(!text.contains("Popular Questions"));
    }
}
