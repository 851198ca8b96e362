//! Output sent to a remote terminal
//!
//! Screens produce plain text. The session driver wraps that text, plus a
//! handful of terminal controls, into [`Output`] values which the
//! [`OutputCodec`](crate::OutputCodec) encodes as crossterm commands.

/// A unit of output for the remote terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Switch to the alternate screen buffer and hide the cursor
    EnterAltScreen,
    /// Restore the cursor and the main screen buffer
    LeaveAltScreen,
    /// Replace the whole screen with a rendered frame
    Draw(String),
    /// Ring the terminal bell
    Bell,
    /// Set the terminal window title
    SetTitle(String),
}
