use crate::core::{ChatState, DisplayContent};
use crate::tui::app::{App, Focus, Screen};
use crate::tui::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

pub fn draw<S, C>(f: &mut Frame, app: &mut App<S, C>) {
    let palette = app.theme.palette();
    f.render_widget(
        Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
        f.area(),
    );

    draw_main(f, app, &palette);
    if app.screen == Screen::Chat {
        draw_chat(f, app, &palette);
    }
}

fn draw_main<S, C>(f: &mut Frame, app: &mut App<S, C>, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // URL input
            Constraint::Min(1),    // Display
            Constraint::Length(3), // Status
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let title = Paragraph::new("Video Transcript Analyzer")
        .style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    app.url_input.render(f, chunks[1], palette);

    let display_focused = app.screen == Screen::Main && app.focus == Focus::Display;
    let display_palette = match app.display {
        DisplayContent::Error(_) => Palette {
            fg: palette.error,
            ..*palette
        },
        _ => *palette,
    };
    app.viewer
        .render(f, chunks[2], &display_palette, display_focused);

    app.status.render(f, chunks[3], palette);

    let help_text = match app.focus {
        Focus::Url => "[Enter] Download  [Tab] Display  [Ctrl+C] Exit",
        Focus::Display if app.editing => {
            "Type or paste to append  [Enter] New line  [Backspace] Delete  [Esc] Done"
        }
        Focus::Display => {
            "[s] Summarize  [c] Chat  [e] Edit  [y] Copy  [t] Theme  [↑↓] Scroll  [Tab] URL  [q] Exit"
        }
    };
    f.render_widget(help(help_text, palette), chunks[4]);
}

fn draw_chat<S, C>(f: &mut Frame, app: &mut App<S, C>, palette: &Palette) {
    let Some(chat) = &mut app.chat else {
        return;
    };

    let area = centered(f.area(), 80, 80);
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Conversation
            Constraint::Length(3), // Message input
            Constraint::Length(3), // Help
        ])
        .split(area);

    chat.viewer.render(f, chunks[0], palette, false);
    chat.input.render(f, chunks[1], palette);

    let help_text = match chat.session.state() {
        ChatState::Idle => "[Enter] Send  [↑↓] Scroll  [Esc] Close",
        ChatState::AwaitingReply => "Waiting for reply...  [↑↓] Scroll  [Esc] Close",
    };
    f.render_widget(help(help_text, palette), chunks[2]);
}

fn help<'a>(text: &'a str, palette: &Palette) -> Paragraph<'a> {
    Paragraph::new(text)
        .style(Style::default().fg(palette.muted).bg(palette.bg))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}
