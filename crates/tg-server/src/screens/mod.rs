//! Screens shown to a session, and assembly of the per-session screen set

pub mod frame;
pub mod login;
pub mod text_input;

pub use login::LoginScreen;

use tg_core::config::{Capability, ScreenSlot};
use tg_core::traits::Screen;

/// Build a fresh screen set from the configured slots
///
/// Each slot yields at most one screen. Slots declaring no capability are
/// skipped.
pub fn build_screen_set(slots: &[ScreenSlot]) -> Vec<Box<dyn Screen>> {
    let mut screens: Vec<Box<dyn Screen>> = Vec::with_capacity(slots.len());

    for slot in slots {
        match slot.capability() {
            Some(Capability::Login(params)) => {
                screens.push(Box::new(LoginScreen::new(params.clone())));
            }
            None => {
                tracing::warn!(slot = %slot.id, "Screen slot declares no capability, skipping");
            }
        }
    }

    screens
}
