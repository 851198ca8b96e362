//! tg-protocol: Terminal wire handling for termgate sessions
//!
//! This crate turns the raw byte stream a remote terminal sends over an SSH
//! channel into [`Key`] presses, and turns screen output into the ANSI byte
//! sequences the terminal expects.

pub mod codec;
pub mod error;
pub mod key;
pub mod output;
pub mod session;

pub use codec::{InputCodec, OutputCodec};
pub use error::ProtocolError;
pub use key::Key;
pub use output::Output;
pub use session::SessionId;
