//! Single-line text editing shared by the path input and the query form.
//!
//! The cursor is a byte offset into `buffer`, always on a char boundary.
//! Long values scroll horizontally so the cursor stays visible; widths are
//! measured in terminal columns via `unicode-width`.

use unicode_width::UnicodeWidthStr;

use crate::tui::event::TuiEvent;

#[derive(Debug, Default, Clone)]
pub struct TextField {
    buffer: String,
    cursor: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Return the contents and leave the field empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Apply an editing event. Returns `true` if the text or cursor changed.
    pub fn handle_event(&mut self, event: &TuiEvent) -> bool {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                true
            }
            TuiEvent::Paste(text) => {
                // Single line: pasted newlines would never reach the loader intact
                let text: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
                self.buffer.insert_str(self.cursor, &text);
                self.cursor += text.len();
                !text.is_empty()
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                true
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                true
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                true
            }
            TuiEvent::CursorRight if self.cursor < self.buffer.len() => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                true
            }
            TuiEvent::CursorHome if self.cursor > 0 => {
                self.cursor = 0;
                true
            }
            TuiEvent::CursorEnd if self.cursor < self.buffer.len() => {
                self.cursor = self.buffer.len();
                true
            }
            _ => false,
        }
    }

    /// The slice of text to draw in `width` columns and the cursor's column
    /// within it.
    pub fn viewport(&self, width: u16) -> (&str, u16) {
        let max = width.saturating_sub(1) as usize;
        let before = &self.buffer[..self.cursor];
        let mut start = 0;
        while start < before.len() && before[start..].width() > max {
            start = next_char_boundary(before, start);
        }
        (&self.buffer[start..], before[start..].width() as u16)
    }
}

fn prev_char_boundary(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
}

fn next_char_boundary(s: &str, pos: usize) -> usize {
    s[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextField {
        let mut field = TextField::new();
        for c in text.chars() {
            field.handle_event(&TuiEvent::InputChar(c));
        }
        field
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut field = typed("abc");
        assert_eq!(field.text(), "abc");
        assert!(field.handle_event(&TuiEvent::Backspace));
        assert_eq!(field.text(), "ab");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn test_edit_in_middle() {
        let mut field = typed("ac");
        field.handle_event(&TuiEvent::CursorLeft);
        field.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(field.text(), "abc");
        field.handle_event(&TuiEvent::CursorHome);
        field.handle_event(&TuiEvent::Delete);
        assert_eq!(field.text(), "bc");
    }

    #[test]
    fn test_multibyte_chars() {
        let mut field = typed("café");
        field.handle_event(&TuiEvent::Backspace);
        assert_eq!(field.text(), "caf");
        field.handle_event(&TuiEvent::InputChar('é'));
        field.handle_event(&TuiEvent::CursorLeft);
        assert_eq!(field.cursor(), 3);
    }

    #[test]
    fn test_boundaries_report_no_change() {
        let mut field = TextField::new();
        assert!(!field.handle_event(&TuiEvent::Backspace));
        assert!(!field.handle_event(&TuiEvent::Delete));
        assert!(!field.handle_event(&TuiEvent::CursorLeft));
        assert!(!field.handle_event(&TuiEvent::Submit));
    }

    #[test]
    fn test_paste_strips_newlines() {
        let mut field = TextField::new();
        field.handle_event(&TuiEvent::Paste("/tmp/roster.xlsx\r\n".into()));
        assert_eq!(field.text(), "/tmp/roster.xlsx");
        assert_eq!(field.cursor(), field.text().len());
    }

    #[test]
    fn test_take_resets() {
        let mut field = typed("roster.csv");
        assert_eq!(field.take(), "roster.csv");
        assert!(field.is_empty());
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn test_viewport_scrolls_to_cursor() {
        let field = typed("abcdefghij");
        let (visible, col) = field.viewport(5);
        assert_eq!(visible, "ghij");
        assert_eq!(col, 4);

        let short = typed("abc");
        let (visible, col) = short.viewport(10);
        assert_eq!(visible, "abc");
        assert_eq!(col, 3);
    }

    #[test]
    fn test_viewport_counts_wide_chars() {
        let field = typed("日本");
        let (_, col) = field.viewport(20);
        assert_eq!(col, 4);
    }
}
