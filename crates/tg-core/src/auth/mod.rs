//! Credential strategies for the login gate

mod basic;
mod strategy;

pub use basic::{BasicAuth, DEFAULT_REALM};
pub use strategy::{Strategies, Strategy};
