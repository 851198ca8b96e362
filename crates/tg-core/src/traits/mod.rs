//! Core trait definitions

mod screen;
mod transport;

pub use screen::{Effect, FollowUp, Navigation, Reaction, Screen, TransitionKind, TransitionRequest};
pub use transport::Transport;
