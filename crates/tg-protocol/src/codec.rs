//! Tokio codecs for terminal input and output

use std::io::Write;

use bytes::{Buf, BufMut, BytesMut};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ProtocolError;
use crate::key::Key;
use crate::output::Output;

/// Longest escape sequence kept in the buffer while waiting for its final byte
pub const MAX_SEQUENCE_LEN: usize = 32;

const BELL: &[u8] = b"\x07";

/// Result of looking at the head of the input buffer
enum Step {
    /// A key spanning `len` bytes
    Key(usize, Key),
    /// `len` bytes that carry nothing we act on
    Skip(usize),
    /// The buffer ends inside a sequence
    Incomplete,
}

/// Decoder turning raw terminal bytes into [`Key`] presses
#[derive(Debug, Default)]
pub struct InputCodec {
    /// Last decoded byte was a carriage return, so a following `\n` is part
    /// of the same line ending
    after_cr: bool,
}

impl InputCodec {
    /// Create a new codec
    pub fn new() -> Self {
        Self { after_cr: false }
    }

    fn step(&mut self, src: &BytesMut) -> Result<Step, ProtocolError> {
        let first = src[0];
        let after_cr = std::mem::replace(&mut self.after_cr, false);

        let step = match first {
            0x1b => decode_escape(src)?,
            b'\r' => {
                self.after_cr = true;
                Step::Key(1, Key::Enter)
            }
            b'\n' if after_cr => Step::Skip(1),
            b'\n' => Step::Key(1, Key::Enter),
            b'\t' => Step::Key(1, Key::Tab),
            0x7f | 0x08 => Step::Key(1, Key::Backspace),
            0x01..=0x1a => Step::Key(1, Key::Ctrl((b'a' + first - 1) as char)),
            0x20..=0x7e => Step::Key(1, Key::Char(first as char)),
            0x80..=0xff => decode_utf8(src),
            _ => Step::Skip(1),
        };

        Ok(step)
    }
}

impl Decoder for InputCodec {
    type Item = Key;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            if src.is_empty() {
                return Ok(None);
            }

            match self.step(src)? {
                Step::Key(len, key) => {
                    src.advance(len);
                    return Ok(Some(key));
                }
                Step::Skip(len) => {
                    tracing::trace!("Skipping {} unrecognised input bytes", len);
                    src.advance(len);
                }
                Step::Incomplete => return Ok(None),
            }
        }
    }
}

/// Decode a sequence starting with ESC
fn decode_escape(src: &BytesMut) -> Result<Step, ProtocolError> {
    // A lone ESC at the end of a read is the escape key itself
    let Some(&introducer) = src.get(1) else {
        return Ok(Step::Key(1, Key::Esc));
    };

    match introducer {
        b'[' => decode_csi(src),
        b'O' => Ok(decode_ss3(src)),
        0x1b => Ok(Step::Key(1, Key::Esc)),
        0x20..=0x7e => Ok(Step::Key(2, Key::Alt(introducer as char))),
        // Meta prefix on a key with no Alt form; the key itself follows
        _ => Ok(Step::Skip(1)),
    }
}

/// Decode `ESC [ params final`
fn decode_csi(src: &BytesMut) -> Result<Step, ProtocolError> {
    let Some(offset) = src[2..].iter().position(|b| (0x40..=0x7e).contains(b)) else {
        if src.len() > MAX_SEQUENCE_LEN {
            return Err(ProtocolError::SequenceTooLong { len: src.len() });
        }
        return Ok(Step::Incomplete);
    };

    let end = 2 + offset;
    let params = &src[2..end];
    let len = end + 1;

    let key = match (params, src[end]) {
        (b"", b'A') => Key::Up,
        (b"", b'B') => Key::Down,
        (b"", b'C') => Key::Right,
        (b"", b'D') => Key::Left,
        (b"", b'H') => Key::Home,
        (b"", b'F') => Key::End,
        (b"", b'Z') => Key::BackTab,
        (b"1;5" | b"5", b'C') => Key::CtrlRight,
        (b"1;5" | b"5", b'D') => Key::CtrlLeft,
        (b"1" | b"7", b'~') => Key::Home,
        (b"4" | b"8", b'~') => Key::End,
        (b"3", b'~') => Key::Delete,
        _ => return Ok(Step::Skip(len)),
    };

    Ok(Step::Key(len, key))
}

/// Decode `ESC O final` (application cursor mode)
fn decode_ss3(src: &BytesMut) -> Step {
    let Some(&last) = src.get(2) else {
        return Step::Incomplete;
    };

    let key = match last {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        b'D' => Key::Left,
        b'H' => Key::Home,
        b'F' => Key::End,
        _ => return Step::Skip(3),
    };

    Step::Key(3, key)
}

/// Decode one multi-byte UTF-8 character
fn decode_utf8(src: &BytesMut) -> Step {
    let width = match src[0] {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return Step::Skip(1),
    };

    if src.len() < width {
        return Step::Incomplete;
    }

    match std::str::from_utf8(&src[..width])
        .ok()
        .and_then(|s| s.chars().next())
    {
        Some(c) => Step::Key(width, Key::Char(c)),
        None => Step::Skip(1),
    }
}

/// Encoder turning [`Output`] into ANSI bytes
#[derive(Debug, Default)]
pub struct OutputCodec;

impl OutputCodec {
    /// Create a new codec
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<Output> for OutputCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: Output, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let mut out = dst.writer();

        match item {
            Output::EnterAltScreen => queue!(out, EnterAlternateScreen, Hide)?,
            Output::LeaveAltScreen => queue!(out, Show, LeaveAlternateScreen)?,
            Output::Draw(text) => {
                queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;

                // Raw-mode terminals do not return the carriage on a bare \n
                for (i, line) in text.split('\n').enumerate() {
                    if i > 0 {
                        queue!(out, Print("\r\n"))?;
                    }
                    queue!(out, Print(line.trim_end_matches('\r')))?;
                }
            }
            Output::Bell => out.write_all(BELL)?,
            Output::SetTitle(title) => {
                if title.chars().any(char::is_control) {
                    return Err(ProtocolError::InvalidTitle);
                }
                queue!(out, SetTitle(title))?;
            }
        }

        Ok(())
    }
}
