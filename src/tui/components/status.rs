use crate::tui::theme::Palette;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// One-line status bar with a spinner while a request is in flight.
pub struct StatusLine {
    pub message: String,
    pub updated_at: Option<String>,
    pub busy: bool,
    frame: usize,
}

impl StatusLine {
    pub fn new() -> Self {
        Self {
            message: String::new(),
            updated_at: None,
            busy: false,
            frame: 0,
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.updated_at = Some(chrono::Local::now().format("%H:%M:%S").to_string());
    }

    pub fn start(&mut self, message: impl Into<String>) {
        self.busy = true;
        self.frame = 0;
        self.set_message(message);
    }

    pub fn finish(&mut self, message: impl Into<String>) {
        self.busy = false;
        self.set_message(message);
    }

    pub fn tick(&mut self) {
        if self.busy {
            self.frame = (self.frame + 1) % SPINNER.len();
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, palette: &Palette) {
        let spinner = if self.busy { SPINNER[self.frame] } else { " " };
        let text = match &self.updated_at {
            Some(at) => format!("{spinner} [{at}] {}", self.message),
            None => format!("{spinner} {}", self.message),
        };

        let paragraph = Paragraph::new(text)
            .style(
                Style::default()
                    .fg(palette.muted)
                    .bg(palette.bg)
                    .add_modifier(Modifier::ITALIC),
            )
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}
