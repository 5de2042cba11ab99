use crate::domain::HexColor;
use std::cmp::min;

/// Longest useful entry: `#` plus six digits.
const MAX_CHARS: usize = 7;

/// Single-line editor for typing a color by hand. Only hex digits and `#`
/// are accepted; all text is ASCII so columns and byte offsets coincide.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HexInput {
    pub text: String,
    pub cursor_col: usize,
}

impl HexInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let mut input = Self::new();
        input.insert_str(text);
        input
    }

    /// The color typed so far, if it is a complete one.
    pub fn color(&self) -> Option<HexColor> {
        HexColor::parse(&self.text)
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        if !is_accepted(ch) || self.text.len() >= MAX_CHARS {
            return false;
        }
        if ch == '#' && (self.cursor_col != 0 || self.text.starts_with('#')) {
            return false;
        }

        self.clamp_cursor();
        self.text.insert(self.cursor_col, ch);
        self.cursor_col += 1;
        true
    }

    /// Inserts what fits and is accepted; other characters are dropped.
    pub fn insert_str(&mut self, text: &str) -> bool {
        let mut changed = false;
        for ch in text.trim().chars() {
            changed |= self.insert_char(ch);
        }
        changed
    }

    pub fn backspace(&mut self) -> bool {
        self.clamp_cursor();
        if self.cursor_col == 0 {
            return false;
        }
        self.cursor_col -= 1;
        self.text.remove(self.cursor_col);
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        self.clamp_cursor();
        if self.cursor_col >= self.text.len() {
            return false;
        }
        self.text.remove(self.cursor_col);
        true
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor_col = 0;
    }

    pub fn move_left(&mut self) {
        self.clamp_cursor();
        self.cursor_col = self.cursor_col.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.clamp_cursor();
        self.cursor_col = (self.cursor_col + 1).min(self.text.len());
    }

    pub fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_col = self.text.len();
    }

    fn clamp_cursor(&mut self) {
        self.cursor_col = min(self.cursor_col, self.text.len());
    }
}

fn is_accepted(ch: char) -> bool {
    ch == '#' || ch.is_ascii_hexdigit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_hex_digits_and_leading_hash() {
        let mut input = HexInput::new();
        input.insert_str("#zz12#g34x56");
        assert_eq!(input.text, "#123456");
        assert_eq!(input.cursor_col, 7);
        assert!(!input.insert_char('7'));
    }

    #[test]
    fn color_is_available_once_complete() {
        let mut input = HexInput::from_text("#abcde");
        assert_eq!(input.color(), None);
        input.insert_char('f');
        assert_eq!(input.color(), HexColor::parse("#ABCDEF"));
    }

    #[test]
    fn edits_at_cursor() {
        let mut input = HexInput::from_text("#12456");
        input.move_home();
        input.move_right();
        input.move_right();
        input.move_right();
        input.insert_char('3');
        assert_eq!(input.text, "#123456");
        input.backspace();
        input.delete_forward();
        assert_eq!(input.text, "#1256");
        assert_eq!(input.cursor_col, 3);
    }

    #[test]
    fn pasted_text_is_trimmed() {
        let input = HexInput::from_text("  ff8800\n");
        assert_eq!(input.text, "ff8800");
        assert_eq!(input.color(), HexColor::parse("#FF8800"));
    }
}
