use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Text buffer for the chat input line with grapheme-aware cursor
/// movement and editing.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    /// The text content.
    content: String,
    /// Cursor position as a byte index into `content`.
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Content length in graphemes, not bytes.
    pub fn len(&self) -> usize {
        self.content.graphemes(true).count()
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Take the trimmed content out of the buffer, leaving it empty.
    pub fn take_trimmed(&mut self) -> String {
        let text = self.content.trim().to_string();
        self.clear();
        text
    }

    pub fn insert_char(&mut self, ch: char) {
        self.content.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.content.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Delete the grapheme before the cursor (Backspace).
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }

        let mut boundaries: Vec<_> = self
            .content
            .grapheme_indices(true)
            .take_while(|(idx, _)| *idx < self.cursor)
            .collect();

        if let Some((start, grapheme)) = boundaries.pop() {
            self.content.drain(start..start + grapheme.len());
            self.cursor = start;
            true
        } else {
            false
        }
    }

    /// Delete the grapheme under the cursor (Delete).
    pub fn delete_char(&mut self) -> bool {
        if self.cursor >= self.content.len() {
            return false;
        }

        let range = self
            .content
            .grapheme_indices(true)
            .find(|(idx, _)| *idx >= self.cursor)
            .map(|(start, grapheme)| start..start + grapheme.len());

        if let Some(range) = range {
            self.content.drain(range);
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }

        let mut previous = 0;
        for (pos, _) in self.content.grapheme_indices(true) {
            if pos >= self.cursor {
                break;
            }
            previous = pos;
        }
        self.cursor = previous;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.content.len() {
            return false;
        }

        for (pos, grapheme) in self.content.grapheme_indices(true) {
            if pos >= self.cursor {
                self.cursor = pos + grapheme.len();
                return true;
            }
        }
        false
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Display column of the cursor, accounting for wide characters.
    pub fn cursor_display_column(&self) -> u16 {
        self.content[..self.cursor].width() as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buffer = InputBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.cursor_position(), 0);
    }

    #[test]
    fn test_insert_and_len() {
        let mut buffer = InputBuffer::new();
        buffer.insert_char('H');
        buffer.insert_char('i');

        assert_eq!(buffer.content(), "Hi");
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.cursor_position(), 2);
    }

    #[test]
    fn test_backspace() {
        let mut buffer = InputBuffer::new();
        buffer.insert_str("Hello");

        assert!(buffer.backspace());
        assert_eq!(buffer.content(), "Hell");
        assert_eq!(buffer.cursor_position(), 4);

        buffer.move_to_start();
        assert!(!buffer.backspace());
    }

    #[test]
    fn test_delete_char() {
        let mut buffer = InputBuffer::new();
        buffer.insert_str("Hello");
        buffer.move_to_start();

        assert!(buffer.delete_char());
        assert_eq!(buffer.content(), "ello");

        buffer.move_to_end();
        assert!(!buffer.delete_char());
    }

    #[test]
    fn test_cursor_movement() {
        let mut buffer = InputBuffer::new();
        buffer.insert_str("Hello");

        assert!(buffer.move_left());
        assert_eq!(buffer.cursor_position(), 4);

        buffer.move_to_start();
        assert!(!buffer.move_left());

        buffer.move_to_end();
        assert_eq!(buffer.cursor_position(), 5);
        assert!(!buffer.move_right());
    }

    #[test]
    fn test_unicode_handling() {
        let mut buffer = InputBuffer::new();
        buffer.insert_str("🦀rust");

        // The crab emoji is 4 bytes but 1 grapheme
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.cursor_position(), 8);

        buffer.move_left();
        buffer.insert_char('!');
        assert_eq!(buffer.content(), "🦀rus!t");
    }

    #[test]
    fn test_take_trimmed() {
        let mut buffer = InputBuffer::new();
        buffer.insert_str("  Met Dr. Smith today  ");

        assert_eq!(buffer.take_trimmed(), "Met Dr. Smith today");
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor_position(), 0);

        buffer.insert_str("   ");
        assert_eq!(buffer.take_trimmed(), "");
    }
}
