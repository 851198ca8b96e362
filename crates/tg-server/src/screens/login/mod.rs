//! Login form screen
//!
//! Two text fields (identity and masked secret) followed by Submit and Cancel
//! buttons. Focus cycles over all four controls. A row of tabs selects which
//! credential strategy a submission is validated against.

mod keymap;
mod view;

use chrono::{DateTime, Local};

use tg_core::config::LoginParams;
use tg_core::time::{self, Timed};
use tg_core::traits::{Effect, FollowUp, Reaction, Screen, TransitionKind};
use tg_core::{AuthError, Event, SizingContext};
use tg_protocol::Key;

use self::keymap::Action;
use super::text_input::TextInput;

/// Number of text fields
pub const FIELD_COUNT: usize = 2;
/// Number of focusable controls: the fields plus Submit and Cancel
pub const CONTROL_COUNT: usize = FIELD_COUNT + 2;

const IDENTITY: usize = 0;
const SECRET: usize = 1;
const SUBMIT: usize = FIELD_COUNT;
const CANCEL: usize = FIELD_COUNT + 1;

/// Window title set when the form becomes active
pub const TITLE: &str = "termgate - login";

/// The login form
pub struct LoginScreen {
    params: LoginParams,
    sizing: SizingContext,
    inputs: [TextInput; FIELD_COUNT],
    focus: usize,
    selected: String,
    last_error: Option<Timed<AuthError>>,
    clock: DateTime<Local>,
}

impl LoginScreen {
    /// Create a login form over prepared strategies
    pub fn new(params: LoginParams) -> Self {
        let selected = params.default_selection().to_string();
        Self {
            params,
            sizing: SizingContext::default(),
            inputs: [TextInput::new(), TextInput::masked('*')],
            focus: IDENTITY,
            selected,
            last_error: None,
            clock: time::now(),
        }
    }

    /// Index of the focused control
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Name of the selected strategy
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// The error of the last failed submission, if any
    pub fn last_error(&self) -> Option<&Timed<AuthError>> {
        self.last_error.as_ref()
    }

    /// Content of the identity and secret fields
    pub fn field_values(&self) -> (String, String) {
        (self.inputs[IDENTITY].value(), self.inputs[SECRET].value())
    }

    /// Stored terminal size
    pub fn sizing(&self) -> SizingContext {
        self.sizing
    }

    fn set_focus(&mut self, focus: usize) {
        self.focus = focus % CONTROL_COUNT;
        for (i, input) in self.inputs.iter_mut().enumerate() {
            if i == self.focus {
                input.focus();
            } else {
                input.blur();
            }
        }
    }

    fn handle_key(&mut self, key: &Key) -> Reaction {
        match keymap::action_for(key) {
            Some(Action::NextFocus) => {
                self.set_focus(self.focus + 1);
                Reaction::none()
            }
            Some(Action::PrevFocus) => {
                self.set_focus(self.focus + CONTROL_COUNT - 1);
                Reaction::none()
            }
            Some(Action::NextTab) => {
                self.selected = self.params.tabs.cycle(&self.selected, true).to_string();
                Reaction::none()
            }
            Some(Action::PrevTab) => {
                self.selected = self.params.tabs.cycle(&self.selected, false).to_string();
                Reaction::none()
            }
            Some(Action::Login) => self.submit(),
            Some(Action::Select) => match self.focus {
                SUBMIT => self.submit(),
                CANCEL => Reaction::transition(TransitionKind::Quit, self.sizing),
                _ => self.edit(key),
            },
            Some(Action::Quit) => {
                for input in &mut self.inputs {
                    input.blur();
                }
                Reaction::transition(TransitionKind::Quit, self.sizing)
            }
            None => self.edit(key),
        }
    }

    fn edit(&mut self, key: &Key) -> Reaction {
        if let Some(input) = self.inputs.get_mut(self.focus) {
            input.handle_key(key);
        }
        Reaction::none()
    }

    fn submit(&mut self) -> Reaction {
        let (identity, secret) = self.field_values();

        match self.params.tabs.login(&self.selected, &identity, &secret) {
            Ok(()) => {
                tracing::info!(identity = %identity, strategy = %self.selected, "Login accepted");
                self.last_error = None;
                Reaction::transition(TransitionKind::Next, self.sizing)
            }
            Err(err) => {
                if err == AuthError::NotPrepared {
                    tracing::error!(strategy = %self.selected, "Login attempted against unprepared strategy");
                } else {
                    tracing::warn!(identity = %identity, strategy = %self.selected, "Login rejected: {}", err);
                }
                self.last_error = Some(Timed::new(err, self.clock));
                Reaction::follow_up(FollowUp::effect(Effect::Bell))
            }
        }
    }
}

impl Screen for LoginScreen {
    fn name(&self) -> &str {
        "login"
    }

    fn initialize(&mut self, sizing: SizingContext) -> FollowUp {
        self.sizing = sizing;
        self.set_focus(IDENTITY);
        FollowUp::effect(Effect::SetTitle(TITLE.to_string()))
    }

    fn handle_event(&mut self, event: &Event) -> Reaction {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(sizing) => {
                self.sizing = *sizing;
                Reaction::none()
            }
            // Only stamps the next failed submit
            Event::Tick(now) => {
                self.clock = *now;
                Reaction::none()
            }
        }
    }

    fn render(&self) -> String {
        view::render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use tg_core::auth::{BasicAuth, Strategies, Strategy};
    use unicode_width::UnicodeWidthStr;

    fn params(names: &[&str]) -> LoginParams {
        let strategies: Vec<Strategy> = names
            .iter()
            .map(|name| Strategy {
                name: name.to_string(),
                basic_auth: Some(BasicAuth::new(vec!["alice:hunter2".to_string()])),
            })
            .collect();
        let mut tabs = Strategies::from(strategies);
        tabs.prepare().unwrap();
        LoginParams {
            banner: "welcome".to_string(),
            tabs,
            selected: String::new(),
        }
    }

    fn screen() -> LoginScreen {
        let mut screen = LoginScreen::new(params(&["basic"]));
        screen.initialize(SizingContext::new(80, 24));
        screen
    }

    fn press(screen: &mut LoginScreen, key: Key) -> Reaction {
        screen.handle_event(&Event::Key(key))
    }

    fn type_text(screen: &mut LoginScreen, text: &str) {
        for c in text.chars() {
            press(screen, Key::Char(c));
        }
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_initialize_sets_title_and_focus() {
        let mut screen = LoginScreen::new(params(&["basic"]));
        let follow_up = screen.initialize(SizingContext::new(100, 30));
        assert_eq!(follow_up.effects(), &[Effect::SetTitle(TITLE.to_string())]);
        assert_eq!(screen.focus(), 0);
        assert_eq!(screen.sizing(), SizingContext::new(100, 30));
    }

    #[test]
    fn test_successful_login_requests_next() {
        let mut screen = screen();
        type_text(&mut screen, "alice");
        press(&mut screen, Key::Tab);
        type_text(&mut screen, "hunter2");

        let reaction = press(&mut screen, Key::Enter);
        let transition = reaction.transition.unwrap();
        assert_eq!(transition.kind, TransitionKind::Next);
        assert_eq!(transition.sizing, SizingContext::new(80, 24));
        assert!(screen.last_error().is_none());
    }

    #[test]
    fn test_failed_login_records_timed_error() {
        let mut screen = screen();
        screen.handle_event(&Event::Tick(at(12, 0, 1)));
        type_text(&mut screen, "alice");
        press(&mut screen, Key::Tab);
        type_text(&mut screen, "wrong");

        let reaction = press(&mut screen, Key::Enter);
        assert!(reaction.transition.is_none());
        assert_eq!(reaction.follow_up.effects(), &[Effect::Bell]);

        let error = screen.last_error().unwrap();
        assert_eq!(error.error, AuthError::InvalidCredentials);
        assert_eq!(
            error.to_string(),
            "12:00:01 - Login failed: invalid username or password"
        );
        assert!(screen.render().contains("12:00:01 - Login failed"));
    }

    #[test]
    fn test_success_clears_previous_error() {
        let mut screen = screen();
        type_text(&mut screen, "alice");
        press(&mut screen, Key::Enter);
        assert!(screen.last_error().is_some());

        press(&mut screen, Key::Tab);
        type_text(&mut screen, "hunter2");
        let reaction = press(&mut screen, Key::Enter);
        assert!(reaction.transition.is_some());
        assert!(screen.last_error().is_none());
    }

    #[test]
    fn test_unknown_selection() {
        let mut p = params(&["basic"]);
        p.selected = "missing".to_string();
        let mut screen = LoginScreen::new(p);
        screen.initialize(SizingContext::default());

        press(&mut screen, Key::Enter);
        assert_eq!(screen.last_error().unwrap().error, AuthError::NoSelection);
    }

    #[test]
    fn test_space_on_buttons() {
        let mut screen = screen();
        type_text(&mut screen, "alice");
        press(&mut screen, Key::Tab);
        type_text(&mut screen, "hunter2");
        press(&mut screen, Key::Tab);
        assert_eq!(screen.focus(), SUBMIT);

        let reaction = press(&mut screen, Key::Char(' '));
        assert_eq!(reaction.transition.unwrap().kind, TransitionKind::Next);

        press(&mut screen, Key::Tab);
        assert_eq!(screen.focus(), CANCEL);
        let reaction = press(&mut screen, Key::Char(' '));
        assert_eq!(reaction.transition.unwrap().kind, TransitionKind::Quit);
    }

    #[test]
    fn test_space_in_field_inserts() {
        let mut screen = screen();
        type_text(&mut screen, "a b");
        assert_eq!(screen.field_values().0, "a b");
    }

    #[test]
    fn test_quit_keys() {
        for key in [Key::Esc, Key::Ctrl('c')] {
            let mut screen = screen();
            let reaction = press(&mut screen, key);
            assert_eq!(reaction.transition.unwrap().kind, TransitionKind::Quit);
        }
    }

    #[test]
    fn test_keys_ignored_on_buttons() {
        let mut screen = screen();
        press(&mut screen, Key::BackTab);
        assert_eq!(screen.focus(), CANCEL);
        type_text(&mut screen, "xyz");
        assert_eq!(screen.field_values(), (String::new(), String::new()));
    }

    #[test]
    fn test_tabs_cycle_independent_of_focus() {
        let mut screen = LoginScreen::new(params(&["a", "b", "c"]));
        screen.initialize(SizingContext::default());
        press(&mut screen, Key::Tab);

        press(&mut screen, Key::CtrlLeft);
        assert_eq!(screen.selected(), "c");
        press(&mut screen, Key::CtrlRight);
        assert_eq!(screen.selected(), "a");
        assert_eq!(screen.focus(), 1);
    }

    #[test]
    fn test_resize_updates_sizing() {
        let mut screen = screen();
        screen.handle_event(&Event::Resize(SizingContext::new(132, 50)));
        let reaction = press(&mut screen, Key::Esc);
        assert_eq!(reaction.transition.unwrap().sizing, SizingContext::new(132, 50));
    }

    #[test]
    fn test_initialize_keeps_fields_and_error() {
        let mut screen = screen();
        type_text(&mut screen, "alice");
        press(&mut screen, Key::Enter);
        press(&mut screen, Key::Tab);

        screen.initialize(SizingContext::default());
        assert_eq!(screen.focus(), 0);
        assert_eq!(screen.field_values().0, "alice");
        assert!(screen.last_error().is_some());
    }

    #[test]
    fn test_render_layout() {
        let mut screen = LoginScreen::new(params(&["basic", "ldap"]));
        screen.initialize(SizingContext::new(80, 24));
        type_text(&mut screen, "bob");
        press(&mut screen, Key::Tab);
        type_text(&mut screen, "secret");

        let frame = screen.render();
        assert!(frame.contains("welcome"));
        assert!(frame.contains("[basic]  ldap"));
        assert!(frame.contains("bob"));
        assert!(frame.contains("******"));
        assert!(!frame.contains("secret"));
        assert!(frame.contains("  Submit  "));
        assert!(frame.contains("tab next"));
        assert!(frame.contains("esc quit"));

        // 80 columns, 52 wide block
        assert!(frame.lines().next().unwrap().starts_with("              ═"));
    }

    #[test]
    fn test_tick_leaves_frame_unchanged() {
        let mut screen = screen();
        type_text(&mut screen, "alice");
        let before = screen.render();

        let reaction = screen.handle_event(&Event::Tick(at(9, 30, 0)));
        assert!(reaction.transition.is_none());
        assert!(reaction.follow_up.is_empty());
        assert_eq!(screen.render(), before);

        // The ticked clock shows up with the next failure
        press(&mut screen, Key::Enter);
        assert!(screen.render().contains("09:30:00 - Login failed"));
    }

    #[test]
    fn test_wide_text_keeps_box_aligned() {
        let mut p = params(&["basic"]);
        p.banner = "终端登录网关".to_string();
        let mut screen = LoginScreen::new(p);
        screen.initialize(SizingContext::new(80, 24));
        type_text(&mut screen, "用户名");
        press(&mut screen, Key::Enter);

        let frame = screen.render();
        assert!(frame.contains("终端登录网关"));
        assert!(frame.contains("用户名"));

        // Every border row ends at the right edge of the 52 wide block
        let edge = 14 + usize::from(view::FORM_WIDTH);
        let bordered: Vec<&str> = frame
            .lines()
            .filter(|line| line.contains(['│', '┌', '└', '═']))
            .collect();
        assert_eq!(bordered.len(), 12);
        for line in bordered {
            assert_eq!(line.width(), edge, "misaligned row: {:?}", line);
        }
    }

    proptest! {
        #[test]
        fn prop_focus_cycle_closes(start in 0usize..CONTROL_COUNT, back in proptest::bool::ANY) {
            let mut screen = screen();
            for _ in 0..start {
                press(&mut screen, Key::Tab);
            }
            let origin = screen.focus();
            let key = if back { Key::BackTab } else { Key::Tab };
            for _ in 0..CONTROL_COUNT {
                press(&mut screen, key);
                prop_assert!(screen.focus() < CONTROL_COUNT);
                let focused = screen.inputs.iter().filter(|i| i.is_focused()).count();
                prop_assert_eq!(focused, usize::from(screen.focus() < FIELD_COUNT));
            }
            prop_assert_eq!(screen.focus(), origin);
        }
    }
}
