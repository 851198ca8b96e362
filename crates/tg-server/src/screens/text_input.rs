//! Single-line text input

use tg_protocol::Key;

/// Glyph drawn at the cursor position of a focused field
pub const CURSOR_GLYPH: char = '_';

/// An editable single-line field
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    chars: Vec<char>,
    /// Cursor position in characters, `0..=chars.len()`
    cursor: usize,
    focused: bool,
    mask: Option<char>,
}

impl TextInput {
    /// A plain field
    pub fn new() -> Self {
        Self::default()
    }

    /// A field that echoes `mask` instead of its content
    pub fn masked(mask: char) -> Self {
        Self {
            mask: Some(mask),
            ..Self::default()
        }
    }

    /// Current content
    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Apply an editing key. Returns false when the key is not an edit or the
    /// field is not focused.
    pub fn handle_key(&mut self, key: &Key) -> bool {
        if !self.focused || !key.is_editing() {
            return false;
        }

        match *key {
            Key::Char(c) => {
                self.chars.insert(self.cursor, c);
                self.cursor += 1;
            }
            Key::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.chars.remove(self.cursor);
                }
            }
            Key::Delete => {
                if self.cursor < self.chars.len() {
                    self.chars.remove(self.cursor);
                }
            }
            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right => self.cursor = (self.cursor + 1).min(self.chars.len()),
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = self.chars.len(),
            _ => return false,
        }

        true
    }

    /// Render the visible text, with the cursor glyph when focused
    pub fn view(&self) -> String {
        let mut out: String = match self.mask {
            Some(mask) => std::iter::repeat(mask).take(self.chars.len()).collect(),
            None => self.value(),
        };

        if self.focused {
            let byte_index = out
                .char_indices()
                .nth(self.cursor)
                .map(|(i, _)| i)
                .unwrap_or(out.len());
            out.insert(byte_index, CURSOR_GLYPH);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextInput {
        let mut input = TextInput::new();
        input.focus();
        for c in text.chars() {
            input.handle_key(&Key::Char(c));
        }
        input
    }

    #[test]
    fn test_unfocused_ignores_keys() {
        let mut input = TextInput::new();
        assert!(!input.handle_key(&Key::Char('a')));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_typing_and_editing() {
        let mut input = typed("helo");
        input.handle_key(&Key::Left);
        input.handle_key(&Key::Char('l'));
        assert_eq!(input.value(), "hello");

        input.handle_key(&Key::Home);
        input.handle_key(&Key::Delete);
        assert_eq!(input.value(), "ello");

        input.handle_key(&Key::End);
        input.handle_key(&Key::Backspace);
        assert_eq!(input.value(), "ell");
    }

    #[test]
    fn test_backspace_at_start() {
        let mut input = typed("a");
        input.handle_key(&Key::Home);
        input.handle_key(&Key::Backspace);
        assert_eq!(input.value(), "a");
    }

    #[test]
    fn test_non_editing_key_rejected() {
        let mut input = typed("a");
        assert!(!input.handle_key(&Key::Tab));
        assert!(!input.handle_key(&Key::Enter));
    }

    #[test]
    fn test_masked_view() {
        let mut input = TextInput::masked('*');
        input.focus();
        for c in "pässword".chars() {
            input.handle_key(&Key::Char(c));
        }
        assert_eq!(input.value(), "pässword");
        assert_eq!(input.view(), "********_");
        input.blur();
        assert_eq!(input.view(), "********");
    }

    #[test]
    fn test_cursor_follows_edits() {
        let mut input = typed("ab");
        input.handle_key(&Key::Left);
        assert_eq!(input.view(), "a_b");
        input.handle_key(&Key::Home);
        assert_eq!(input.view(), "_ab");
        input.blur();
        assert_eq!(input.view(), "ab");
    }
}
