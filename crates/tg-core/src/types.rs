//! Core domain types

use chrono::{DateTime, Local};
use std::fmt;
use tg_protocol::Key;

/// Current terminal dimensions, handed to a screen whenever it becomes active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizingContext {
    /// Number of columns
    pub width: u16,
    /// Number of rows
    pub height: u16,
}

impl SizingContext {
    /// Create a new sizing context
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Build from the 32-bit dimensions SSH reports, saturating at `u16::MAX`
    pub fn from_pty(cols: u32, rows: u32) -> Self {
        Self {
            width: u16::try_from(cols).unwrap_or(u16::MAX),
            height: u16::try_from(rows).unwrap_or(u16::MAX),
        }
    }
}

impl Default for SizingContext {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

impl fmt::Display for SizingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Input delivered to the active screen of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Key press from the remote terminal
    Key(Key),
    /// Terminal was resized
    Resize(SizingContext),
    /// Periodic clock tick
    Tick(DateTime<Local>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizing_from_pty_saturates() {
        let sizing = SizingContext::from_pty(100_000, 40);
        assert_eq!(sizing.width, u16::MAX);
        assert_eq!(sizing.height, 40);
    }

    #[test]
    fn test_sizing_display() {
        assert_eq!(SizingContext::new(120, 40).to_string(), "120x40");
        assert_eq!(SizingContext::default().to_string(), "80x24");
    }
}
