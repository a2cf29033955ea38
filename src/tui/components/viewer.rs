use crate::core::{Fragment, StyledLine};
use crate::tui::theme::Palette;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthChar;

/// Scrollable read-only text area.
///
/// Lines are wrapped to the pane width before scrolling, so `scroll` and
/// the viewport both count screen rows.
pub struct ContentViewer {
    pub lines: Vec<StyledLine>,
    pub scroll: usize,
    pub title: String,
    rows: Vec<StyledLine>,
    width: Option<usize>,
    viewport: usize,
    follow_end: bool,
}

impl ContentViewer {
    pub fn new(title: &str) -> Self {
        Self {
            lines: Vec::new(),
            scroll: 0,
            title: title.to_string(),
            rows: Vec::new(),
            width: None,
            viewport: 1,
            follow_end: false,
        }
    }

    pub fn set_content(&mut self, lines: Vec<StyledLine>, title: &str) {
        self.lines = lines;
        self.title = title.to_string();
        self.scroll = 0;
        self.follow_end = false;
        self.rewrap();
    }

    fn rewrap(&mut self) {
        self.rows = match self.width {
            Some(width) => self
                .lines
                .iter()
                .flat_map(|line| wrap_line(line, width))
                .collect(),
            None => self.lines.clone(),
        };
    }

    fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(self.viewport)
    }

    /// Also keeps the view pinned to the bottom if the pane is resized
    /// before the next draw.
    pub fn scroll_to_end(&mut self) {
        self.follow_end = true;
        self.scroll = self.max_scroll();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up => {
                self.follow_end = false;
                self.scroll = self.scroll.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                self.follow_end = false;
                if self.scroll < self.max_scroll() {
                    self.scroll += 1;
                }
                true
            }
            KeyCode::PageUp => {
                self.follow_end = false;
                self.scroll = self.scroll.saturating_sub(self.viewport);
                true
            }
            KeyCode::PageDown => {
                self.follow_end = false;
                self.scroll = (self.scroll + self.viewport).min(self.max_scroll());
                true
            }
            KeyCode::Home => {
                self.follow_end = false;
                self.scroll = 0;
                true
            }
            KeyCode::End => {
                self.scroll_to_end();
                true
            }
            _ => false,
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, palette: &Palette, focused: bool) {
        let width = (area.width.saturating_sub(2) as usize).max(1);
        if self.width != Some(width) {
            self.width = Some(width);
            self.rewrap();
        }
        self.viewport = (area.height.saturating_sub(2) as usize).max(1);
        self.scroll = if self.follow_end {
            self.max_scroll()
        } else {
            self.scroll.min(self.max_scroll())
        };

        let lines: Vec<Line> = self
            .rows
            .iter()
            .skip(self.scroll)
            .take(self.viewport)
            .map(|line| {
                Line::from(
                    line.iter()
                        .map(|fragment| {
                            if fragment.bold {
                                Span::styled(
                                    fragment.text.as_str(),
                                    Style::default().add_modifier(Modifier::BOLD),
                                )
                            } else {
                                Span::raw(fragment.text.as_str())
                            }
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        let total_rows = self.rows.len();
        let scroll_info = if total_rows > self.viewport {
            format!(
                " (lines {}-{} of {})",
                self.scroll + 1,
                (self.scroll + self.viewport).min(total_rows),
                total_rows
            )
        } else {
            String::new()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{}{scroll_info}", self.title))
            .border_style(Style::default().fg(if focused {
                palette.accent
            } else {
                palette.muted
            }));

        let paragraph = Paragraph::new(lines)
            .style(Style::default().fg(palette.fg).bg(palette.bg))
            .block(block);

        f.render_widget(paragraph, area);
    }
}

/// Break one styled line into rows no wider than `width` columns,
/// preferring the last whitespace in a row and splitting mid-word only when
/// a word is longer than a row.
fn wrap_line(line: &StyledLine, width: usize) -> Vec<StyledLine> {
    let mut rows = Vec::new();
    let mut current: Vec<(char, bool)> = Vec::new();
    let mut current_width = 0;

    for fragment in line {
        for c in fragment.text.chars() {
            let w = c.width().unwrap_or(0);
            if current_width + w > width && !current.is_empty() {
                let carry = match current.iter().rposition(|(ch, _)| ch.is_whitespace()) {
                    Some(i) => current.split_off(i + 1),
                    None => Vec::new(),
                };
                rows.push(group(&current));
                current_width = carry.iter().map(|(ch, _)| ch.width().unwrap_or(0)).sum();
                current = carry;
            }
            current.push((c, fragment.bold));
            current_width += w;
        }
    }

    rows.push(group(&current));
    rows
}

fn group(chars: &[(char, bool)]) -> StyledLine {
    let mut line: StyledLine = Vec::new();
    for &(c, bold) in chars {
        match line.last_mut() {
            Some(prev) if prev.bold == bold => prev.text.push(c),
            _ => line.push(Fragment {
                text: c.to_string(),
                bold,
            }),
        }
    }
    line
}
