//! SSH server implementation

mod handler;
mod listener;
mod transport;

pub use handler::{ClientHandler, SshConfig, NO_PTY_MESSAGE};
pub use listener::{load_or_generate_host_key, SshServer};
pub use transport::ChannelTransport;
