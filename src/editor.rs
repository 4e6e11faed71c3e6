//! Line-based text buffer behind the editor pane
//!
//! The buffer keeps the text as a list of lines plus a cursor measured in
//! characters. [`EditorBuffer::text`] joins the lines back with `\n`, so the
//! text that went in through [`EditorBuffer::from_text`] comes out unchanged.

#[derive(Debug, Clone)]
pub struct EditorBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
    /// First visible line
    scroll: usize,
}

/// Cursor movement requested by a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        EditorBuffer {
            lines: text.split('\n').map(str::to_string).collect(),
            row: 0,
            col: 0,
            scroll: 0,
        }
    }

    /// Full content, lines joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor position as (line, character) with both zero-based
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        let at = self.byte_offset();
        self.lines[self.row].insert(at, c);
        self.col += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert_char(c);
        }
    }

    pub fn insert_newline(&mut self) {
        let at = self.byte_offset();
        let rest = self.lines[self.row].split_off(at);
        self.row += 1;
        self.lines.insert(self.row, rest);
        self.col = 0;
    }

    /// Delete the character before the cursor, joining lines at column 0.
    /// Returns false when there was nothing to delete.
    pub fn backspace(&mut self) -> bool {
        if self.col > 0 {
            self.col -= 1;
            let at = self.byte_offset();
            self.lines[self.row].remove(at);
            true
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&line);
            true
        } else {
            false
        }
    }

    /// Delete the character under the cursor, joining with the next line at
    /// the end of a line. Returns false when there was nothing to delete.
    pub fn delete(&mut self) -> bool {
        if self.col < self.line_len(self.row) {
            let at = self.byte_offset();
            self.lines[self.row].remove(at);
            true
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
            true
        } else {
            false
        }
    }

    pub fn move_cursor(&mut self, motion: Motion) {
        match motion {
            Motion::Left => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = self.line_len(self.row);
                }
            }
            Motion::Right => {
                if self.col < self.line_len(self.row) {
                    self.col += 1;
                } else if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = 0;
                }
            }
            Motion::Up => {
                if self.row > 0 {
                    self.row -= 1;
                    self.col = self.col.min(self.line_len(self.row));
                }
            }
            Motion::Down => {
                if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = self.col.min(self.line_len(self.row));
                }
            }
            Motion::LineStart => self.col = 0,
            Motion::LineEnd => self.col = self.line_len(self.row),
        }
    }

    /// Adjust the scroll offset so the cursor row is inside a window of
    /// `height` lines, and return the first visible line.
    pub fn visible_from(&mut self, height: usize) -> usize {
        let height = height.max(1);
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + height {
            self.scroll = self.row + 1 - height;
        }
        self.scroll
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn byte_offset(&self) -> usize {
        let line = &self.lines[self.row];
        line.char_indices()
            .nth(self.col)
            .map_or(line.len(), |(i, _)| i)
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::from_text("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_survives_buffer_unchanged() {
        for text in ["", "int x;", "a\n", "\n\nb", "  tabs\tand ünïcode\r\n"] {
            assert_eq!(EditorBuffer::from_text(text).text(), text);
        }
    }

    #[test]
    fn typing_builds_lines() {
        let mut buffer = EditorBuffer::default();
        buffer.insert_str("int main() {");
        buffer.insert_newline();
        buffer.insert_str("    return 0;\n}");
        assert_eq!(buffer.text(), "int main() {\n    return 0;\n}");
        assert_eq!(buffer.cursor(), (2, 1));
    }

    #[test]
    fn backspace_joins_lines() {
        let mut buffer = EditorBuffer::from_text("ab\ncd");
        buffer.move_cursor(Motion::Down);
        assert!(buffer.backspace());
        assert_eq!(buffer.text(), "abcd");
        assert_eq!(buffer.cursor(), (0, 2));
    }

    #[test]
    fn backspace_at_start_is_a_no_op() {
        let mut buffer = EditorBuffer::from_text("x");
        assert!(!buffer.backspace());
        assert_eq!(buffer.text(), "x");
    }

    #[test]
    fn delete_handles_multibyte_chars() {
        let mut buffer = EditorBuffer::from_text("é1\n2");
        assert!(buffer.delete());
        assert_eq!(buffer.text(), "1\n2");
        buffer.move_cursor(Motion::LineEnd);
        assert!(buffer.delete());
        assert_eq!(buffer.text(), "12");
        buffer.move_cursor(Motion::LineEnd);
        assert!(!buffer.delete());
    }

    #[test]
    fn vertical_motion_clamps_column() {
        let mut buffer = EditorBuffer::from_text("long line\nx");
        buffer.move_cursor(Motion::LineEnd);
        buffer.move_cursor(Motion::Down);
        assert_eq!(buffer.cursor(), (1, 1));
    }

    #[test]
    fn scroll_follows_cursor() {
        let mut buffer = EditorBuffer::from_text("1\n2\n3\n4\n5\n6");
        for _ in 0..5 {
            buffer.move_cursor(Motion::Down);
        }
        assert_eq!(buffer.visible_from(3), 3);
        for _ in 0..5 {
            buffer.move_cursor(Motion::Up);
        }
        assert_eq!(buffer.visible_from(3), 0);
    }
}
