//! tg-server: The termgate daemon
//!
//! Accepts SSH connections and runs an isolated session for every
//! interactive shell: an ordered set of screens, starting with a login form,
//! driven by key, resize and clock events from the remote terminal.

pub mod navigator;
pub mod screens;
pub mod server;
pub mod session;
pub mod state;

pub use navigator::Navigator;
pub use state::ServerState;
