//! Screen and navigation traits

use crate::types::{Event, SizingContext};

/// Terminal side effect requested by a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ring the terminal bell
    Bell,
    /// Set the terminal window title
    SetTitle(String),
}

/// Effects to perform after a screen handled something
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowUp(Vec<Effect>);

impl FollowUp {
    /// No effects
    pub fn none() -> Self {
        Self::default()
    }

    /// A single effect
    pub fn effect(effect: Effect) -> Self {
        Self(vec![effect])
    }

    /// Append an effect
    pub fn and(mut self, effect: Effect) -> Self {
        self.0.push(effect);
        self
    }

    /// Append all effects of another follow-up
    pub fn extend(&mut self, other: FollowUp) {
        self.0.extend(other.0);
    }

    /// Whether there is nothing to do
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the effects
    pub fn effects(&self) -> &[Effect] {
        &self.0
    }

    /// Consume into the effects
    pub fn into_effects(self) -> Vec<Effect> {
        self.0
    }
}

/// Which way a screen wants the session to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Advance to the following screen
    Next,
    /// Go back to the preceding screen
    Prev,
    /// End the session
    Quit,
}

/// A transition reported by a screen, carrying its sizing forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRequest {
    pub kind: TransitionKind,
    pub sizing: SizingContext,
}

/// Result of handling one event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    /// Effects to perform
    pub follow_up: FollowUp,
    /// Requested transition, if any
    pub transition: Option<TransitionRequest>,
}

impl Reaction {
    /// Nothing happened that the session needs to act on
    pub fn none() -> Self {
        Self::default()
    }

    /// Only effects, no transition
    pub fn follow_up(follow_up: FollowUp) -> Self {
        Self {
            follow_up,
            transition: None,
        }
    }

    /// Request a transition
    pub fn transition(kind: TransitionKind, sizing: SizingContext) -> Self {
        Self {
            follow_up: FollowUp::none(),
            transition: Some(TransitionRequest { kind, sizing }),
        }
    }
}

/// One screen of a session
///
/// Screens are owned by a single session and only touched from its task.
pub trait Screen: Send {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Called every time the screen becomes active
    fn initialize(&mut self, sizing: SizingContext) -> FollowUp;

    /// Handle a key, resize or tick
    fn handle_event(&mut self, event: &Event) -> Reaction;

    /// Produce the full frame for the current state
    fn render(&self) -> String;
}

/// Moving between the screens of a session
///
/// Each operation returns the follow-up of the screen it initialized, or
/// `None` when there is no screen to move to.
pub trait Navigation {
    /// Activate and initialize the first screen
    fn go_to_first(&mut self, sizing: SizingContext) -> Option<FollowUp>;

    /// Activate and initialize the following screen
    fn advance(&mut self, sizing: SizingContext) -> Option<FollowUp>;

    /// Activate and initialize the preceding screen, staying on the first
    fn retreat(&mut self, sizing: SizingContext) -> Option<FollowUp>;
}
