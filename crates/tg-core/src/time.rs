//! Time utilities for termgate
//!
//! Screens keep a wall clock that is advanced by tick events, and errors shown
//! to the user are stamped with that clock.

use chrono::{DateTime, Local};
use std::fmt;

/// Format used when a clock time is shown on screen
pub const CLOCK_FORMAT: &str = "%H:%M:%S";

/// Current local wall clock time
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Format a timestamp as `HH:MM:SS`
pub fn format_clock(at: &DateTime<Local>) -> String {
    at.format(CLOCK_FORMAT).to_string()
}

/// An error together with the clock time it happened at
///
/// Displays as `HH:MM:SS - error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timed<E> {
    /// The error
    pub error: E,
    /// When it was recorded
    pub at: DateTime<Local>,
}

impl<E> Timed<E> {
    /// Stamp an error with a clock time
    pub fn new(error: E, at: DateTime<Local>) -> Self {
        Self { error, at }
    }
}

impl<E: fmt::Display> fmt::Display for Timed<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", format_clock(&self.at), self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_clock() {
        let at = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(format_clock(&at), "09:05:07");
    }

    #[test]
    fn test_timed_display() {
        let at = Local.with_ymd_and_hms(2024, 3, 1, 23, 59, 1).unwrap();
        let timed = Timed::new("boom", at);
        assert_eq!(timed.to_string(), "23:59:01 - boom");
    }
}
