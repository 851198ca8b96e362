//! Login form key bindings

use tg_protocol::Key;

/// What a bound key does on the login form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextFocus,
    PrevFocus,
    NextTab,
    PrevTab,
    Login,
    Select,
    Quit,
}

/// A set of keys bound to one action, with its help label
#[derive(Debug)]
pub struct Binding {
    pub keys: &'static [Key],
    pub help: &'static str,
    pub action: Action,
}

/// All bindings, in the order shown on the help line
pub const BINDINGS: &[Binding] = &[
    Binding {
        keys: &[Key::Tab],
        help: "next",
        action: Action::NextFocus,
    },
    Binding {
        keys: &[Key::BackTab],
        help: "prev",
        action: Action::PrevFocus,
    },
    Binding {
        keys: &[Key::CtrlRight],
        help: "next tab",
        action: Action::NextTab,
    },
    Binding {
        keys: &[Key::CtrlLeft],
        help: "prev tab",
        action: Action::PrevTab,
    },
    Binding {
        keys: &[Key::Enter],
        help: "login",
        action: Action::Login,
    },
    Binding {
        keys: &[Key::Char(' ')],
        help: "select",
        action: Action::Select,
    },
    Binding {
        keys: &[Key::Esc, Key::Ctrl('c')],
        help: "quit",
        action: Action::Quit,
    },
];

/// Look up the action bound to a key
pub fn action_for(key: &Key) -> Option<Action> {
    BINDINGS
        .iter()
        .find(|binding| binding.keys.contains(key))
        .map(|binding| binding.action)
}

/// Short help line, e.g. `tab next • shift+tab prev • ...`
///
/// Only the first key of each binding is listed.
pub fn help_line() -> String {
    BINDINGS
        .iter()
        .filter_map(|binding| binding.keys.first().map(|key| format!("{} {}", key, binding.help)))
        .collect::<Vec<_>>()
        .join(" • ")
}
