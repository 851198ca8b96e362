//! tg-core: Core abstractions and configuration for termgate
//!
//! This crate provides the types shared by every part of a session: the
//! sizing context and events screens consume, the [`Screen`](traits::Screen),
//! [`Navigation`](traits::Navigation) and [`Transport`](traits::Transport)
//! contracts, the declarative configuration, and the credential strategies
//! the login screen validates against.

pub mod auth;
pub mod config;
pub mod error;
pub mod time;
pub mod traits;
pub mod types;

pub use error::{AuthError, ConfigError, SessionError};
pub use types::{Event, SizingContext};
