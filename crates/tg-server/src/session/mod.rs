//! Session management

pub mod driver;
mod manager;
mod ticker;

pub use driver::{CloseReason, DriverState, SessionDriver};
pub use manager::{SessionInfo, SessionRegistry, SessionTicket};
pub use ticker::{spawn_ticker, TickerGuard};
