use crate::tui::theme::Palette;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

/// Single-line text entry. `cursor` counts chars, not bytes.
#[derive(Debug, Clone)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub placeholder: String,
    pub label: String,
    pub focused: bool,
}

impl InputField {
    pub fn new(label: &str, placeholder: &str) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.to_string(),
            label: label.to_string(),
            focused: false,
        }
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => {
                let idx = self.byte_index(self.cursor);
                self.value.insert(idx, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let idx = self.byte_index(self.cursor);
                    self.value.remove(idx);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.char_count() {
                    let idx = self.byte_index(self.cursor);
                    self.value.remove(idx);
                }
                true
            }
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
                true
            }
            KeyCode::Right => {
                if self.cursor < self.char_count() {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.char_count();
                true
            }
            _ => false,
        }
    }

    /// Text before the cursor, cut from the left so it fits in `width`
    /// columns with room for the cursor mark.
    fn visible_before_cursor(&self, width: usize) -> &str {
        let before = &self.value[..self.byte_index(self.cursor)];
        let budget = width.saturating_sub(1);
        let mut start = 0;
        while before[start..].width() > budget {
            match before[start..].chars().next() {
                Some(c) => start += c.len_utf8(),
                None => break,
            }
        }
        &before[start..]
    }

    pub fn render(&self, f: &mut Frame, area: Rect, palette: &Palette) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.label.as_str())
            .border_style(if self.focused {
                Style::default().fg(palette.accent)
            } else {
                Style::default().fg(palette.muted)
            });

        let text = if self.value.is_empty() && !self.focused {
            Line::from(Span::styled(
                &self.placeholder,
                Style::default().fg(palette.muted),
            ))
        } else if self.focused {
            let inner_width = area.width.saturating_sub(2) as usize;
            let before = self.visible_before_cursor(inner_width);
            let after = &self.value[self.byte_index(self.cursor)..];
            Line::from(vec![
                Span::raw(before),
                Span::styled("│", Style::default().fg(palette.accent)),
                Span::raw(after),
            ])
        } else {
            Line::from(Span::raw(&self.value))
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(palette.fg).bg(palette.bg))
            .block(block);
        f.render_widget(paragraph, area);
    }

    /// Insert pasted text at the cursor, folding line breaks into spaces.
    pub fn insert_str(&mut self, text: &str) {
        let flat = text.lines().collect::<Vec<_>>().join(" ");
        let idx = self.byte_index(self.cursor);
        self.value.insert_str(idx, &flat);
        self.cursor += flat.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(field: &mut InputField, code: KeyCode) {
        field.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(field: &mut InputField, text: &str) {
        for c in text.chars() {
            press(field, KeyCode::Char(c));
        }
    }

    #[test]
    fn editing_handles_multibyte_chars() {
        let mut field = InputField::new("Message", "");
        type_str(&mut field, "héllo");
        press(&mut field, KeyCode::Left);
        press(&mut field, KeyCode::Backspace);
        assert_eq!(field.value, "hélo");
        press(&mut field, KeyCode::Home);
        press(&mut field, KeyCode::Delete);
        assert_eq!(field.value, "élo");
        press(&mut field, KeyCode::End);
        assert_eq!(field.cursor, 3);
    }

    #[test]
    fn long_values_scroll_to_keep_the_cursor_visible() {
        let mut field = InputField::new("URL", "");
        type_str(&mut field, "abcdefghij");
        assert_eq!(field.visible_before_cursor(5), "ghij");
        assert_eq!(field.visible_before_cursor(20), "abcdefghij");
    }

    #[test]
    fn paste_lands_at_the_cursor_on_one_line() {
        let mut field = InputField::new("URL", "");
        type_str(&mut field, "ab");
        press(&mut field, KeyCode::Left);
        field.insert_str("x\ny\n");
        assert_eq!(field.value, "ax yb");
        assert_eq!(field.cursor, 4);
    }

    #[test]
    fn clear_empties_the_field() {
        let mut field = InputField::new("Message", "");
        type_str(&mut field, "hi");
        field.clear();
        assert!(field.value.is_empty());
        assert_eq!(field.cursor, 0);
    }
}
