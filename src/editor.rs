/// Single-line text buffer with a cursor. The cursor counts chars, not bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineEditor {
    content: String,
    cursor: usize,
    pub is_dirty: bool,
}

impl LineEditor {
    pub fn new() -> Self {
        LineEditor::default()
    }

    /// Starts from existing text with the cursor placed after the last char.
    pub fn with_content(content: &str) -> Self {
        LineEditor {
            content: content.to_string(),
            cursor: content.chars().count(),
            is_dirty: false,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' || c == '\r' {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
        self.is_dirty = true;
    }

    /// Backspace.
    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_offset(self.cursor - 1);
        self.content.remove(at);
        self.cursor -= 1;
        self.is_dirty = true;
    }

    /// Delete key: removes the char under the cursor.
    pub fn delete_forward(&mut self) {
        if self.cursor >= self.content.chars().count() {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.content.remove(at);
        self.is_dirty = true;
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.content.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_to_start_of_line(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end_of_line(&mut self) {
        self.cursor = self.content.chars().count();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.is_dirty = false;
    }

    /// Splits the text around the cursor: (before, under cursor, after).
    pub fn split_at_cursor(&self) -> (String, Option<char>, String) {
        let before: String = self.content.chars().take(self.cursor).collect();
        let mut rest = self.content.chars().skip(self.cursor);
        let under = rest.next();
        (before, under, rest.collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_at_cursor() {
        let mut editor = LineEditor::with_content("Buy milk");
        editor.move_to_start_of_line();
        for _ in 0..4 {
            editor.move_cursor_right();
        }
        for c in "oat ".chars() {
            editor.insert_char(c);
        }
        assert_eq!(editor.content(), "Buy oat milk");
        assert_eq!(editor.cursor(), 8);
        assert!(editor.is_dirty);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut editor = LineEditor::with_content("abc");
        editor.delete_char();
        assert_eq!(editor.content(), "ab");

        editor.move_to_start_of_line();
        editor.delete_char();
        assert_eq!(editor.content(), "ab");

        editor.delete_forward();
        assert_eq!(editor.content(), "b");
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_multibyte_chars() {
        let mut editor = LineEditor::with_content("café");
        assert_eq!(editor.cursor(), 4);
        editor.move_cursor_left();
        editor.insert_char('x');
        assert_eq!(editor.content(), "cafxé");
        editor.move_to_end_of_line();
        editor.delete_char();
        assert_eq!(editor.content(), "cafx");
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut editor = LineEditor::new();
        editor.move_cursor_left();
        editor.move_cursor_right();
        assert_eq!(editor.cursor(), 0);
        editor.delete_forward();
        assert!(!editor.is_dirty);
    }

    #[test]
    fn test_newlines_are_ignored() {
        let mut editor = LineEditor::new();
        editor.insert_char('a');
        editor.insert_char('\n');
        assert_eq!(editor.content(), "a");
    }

    #[test]
    fn test_split_at_cursor() {
        let mut editor = LineEditor::with_content("abc");
        editor.move_cursor_left();
        assert_eq!(editor.split_at_cursor(), ("ab".to_string(), Some('c'), String::new()));
        editor.move_to_end_of_line();
        assert_eq!(editor.split_at_cursor(), ("abc".to_string(), None, String::new()));
    }

    #[test]
    fn test_blank_and_clear() {
        let mut editor = LineEditor::with_content("   ");
        assert!(editor.is_blank());
        editor.insert_char('x');
        editor.clear();
        assert_eq!(editor.content(), "");
        assert_eq!(editor.cursor(), 0);
        assert!(!editor.is_dirty);
    }
}
