//! Protocol error types

use thiserror::Error;

/// Errors that can occur while decoding input or encoding output
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Escape sequence grew past the longest sequence we understand
    #[error("Escape sequence too long: {len} bytes without a terminator")]
    SequenceTooLong { len: usize },

    /// Title text contains bytes that would terminate the OSC sequence
    #[error("Invalid title: control characters are not allowed")]
    InvalidTitle,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
