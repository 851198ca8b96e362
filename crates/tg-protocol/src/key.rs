//! Key presses decoded from terminal input

use std::fmt;

/// A single key press received from a remote terminal
///
/// Terminals report modifier combinations through escape sequences, so only
/// the combinations the session screens care about get their own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable character (including space)
    Char(char),
    /// Control combination of a letter, e.g. `Ctrl('c')` for ctrl+c
    Ctrl(char),
    /// Alt (meta) combination, sent by terminals as ESC followed by the key
    Alt(char),
    /// Enter/Return
    Enter,
    /// Tab
    Tab,
    /// Shift+Tab
    BackTab,
    /// Backspace (delete before cursor)
    Backspace,
    /// Delete (delete at cursor)
    Delete,
    /// Escape
    Esc,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Ctrl+arrow left
    CtrlLeft,
    /// Ctrl+arrow right
    CtrlRight,
    /// Home
    Home,
    /// End
    End,
}

impl Key {
    /// Whether this key edits or moves within a text field
    pub fn is_editing(&self) -> bool {
        matches!(
            self,
            Key::Char(_)
                | Key::Backspace
                | Key::Delete
                | Key::Left
                | Key::Right
                | Key::Home
                | Key::End
        )
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(' ') => write!(f, "space"),
            Key::Char(c) => write!(f, "{}", c),
            Key::Ctrl(c) => write!(f, "ctrl+{}", c),
            Key::Alt(c) => write!(f, "alt+{}", c),
            Key::Enter => write!(f, "enter"),
            Key::Tab => write!(f, "tab"),
            Key::BackTab => write!(f, "shift+tab"),
            Key::Backspace => write!(f, "backspace"),
            Key::Delete => write!(f, "delete"),
            Key::Esc => write!(f, "esc"),
            Key::Up => write!(f, "up"),
            Key::Down => write!(f, "down"),
            Key::Left => write!(f, "left"),
            Key::Right => write!(f, "right"),
            Key::CtrlLeft => write!(f, "ctrl+left"),
            Key::CtrlRight => write!(f, "ctrl+right"),
            Key::Home => write!(f, "home"),
            Key::End => write!(f, "end"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        assert_eq!(Key::Char(' ').to_string(), "space");
        assert_eq!(Key::Ctrl('c').to_string(), "ctrl+c");
        assert_eq!(Key::BackTab.to_string(), "shift+tab");
        assert_eq!(Key::CtrlRight.to_string(), "ctrl+right");
        assert_eq!(Key::Alt('b').to_string(), "alt+b");
    }

    #[test]
    fn test_editing_keys() {
        assert!(Key::Char('a').is_editing());
        assert!(Key::Backspace.is_editing());
        assert!(!Key::Tab.is_editing());
        assert!(!Key::Ctrl('c').is_editing());
        assert!(!Key::Alt('b').is_editing());
    }
}
