//! Per-session screen navigation

use tg_core::traits::{FollowUp, Navigation, Screen};
use tg_core::SizingContext;

/// Owns a session's screen set and tracks which screen is active
pub struct Navigator {
    screens: Vec<Box<dyn Screen>>,
    /// `None` until [`go_to_first`](Navigation::go_to_first) succeeds
    active: Option<usize>,
}

impl Navigator {
    /// Create an uninitialized navigator over a screen set
    pub fn new(screens: Vec<Box<dyn Screen>>) -> Self {
        Self {
            screens,
            active: None,
        }
    }

    /// Number of screens in the set
    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Index of the active screen
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The active screen
    pub fn active(&self) -> Option<&dyn Screen> {
        let index = self.active?;
        self.screens.get(index).map(|s| s.as_ref())
    }

    /// The active screen, mutably
    pub fn active_mut(&mut self) -> Option<&mut (dyn Screen + 'static)> {
        let index = self.active?;
        self.screens.get_mut(index).map(|s| s.as_mut())
    }

    fn activate(&mut self, index: usize, sizing: SizingContext) -> Option<FollowUp> {
        let screen = self.screens.get_mut(index)?;
        self.active = Some(index);
        tracing::debug!(screen = screen.name(), index, "Activating screen");
        Some(screen.initialize(sizing))
    }
}

impl Navigation for Navigator {
    fn go_to_first(&mut self, sizing: SizingContext) -> Option<FollowUp> {
        if self.screens.is_empty() {
            tracing::warn!("No screens configured");
            return None;
        }
        self.activate(0, sizing)
    }

    fn advance(&mut self, sizing: SizingContext) -> Option<FollowUp> {
        let Some(current) = self.active else {
            tracing::warn!("advance called before the first screen was activated");
            return None;
        };

        let next = current + 1;
        if next >= self.screens.len() {
            tracing::debug!(index = current, "Already at the last screen");
            return None;
        }
        self.activate(next, sizing)
    }

    fn retreat(&mut self, sizing: SizingContext) -> Option<FollowUp> {
        let Some(current) = self.active else {
            tracing::warn!("retreat called before the first screen was activated");
            return None;
        };

        self.activate(current.saturating_sub(1), sizing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tg_core::traits::{Effect, Reaction};
    use tg_core::Event;

    /// Screen that counts its initializations
    struct Recorder {
        name: String,
        inits: Arc<AtomicUsize>,
    }

    impl Screen for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn initialize(&mut self, _sizing: SizingContext) -> FollowUp {
            self.inits.fetch_add(1, Ordering::SeqCst);
            FollowUp::effect(Effect::SetTitle(self.name.clone()))
        }

        fn handle_event(&mut self, _event: &Event) -> Reaction {
            Reaction::none()
        }

        fn render(&self) -> String {
            self.name.clone()
        }
    }

    fn navigator(count: usize) -> (Navigator, Vec<Arc<AtomicUsize>>) {
        let counters: Vec<_> = (0..count).map(|_| Arc::new(AtomicUsize::new(0))).collect();
        let screens = counters
            .iter()
            .enumerate()
            .map(|(i, inits)| {
                Box::new(Recorder {
                    name: format!("s{}", i),
                    inits: Arc::clone(inits),
                }) as Box<dyn Screen>
            })
            .collect();
        (Navigator::new(screens), counters)
    }

    fn sizing() -> SizingContext {
        SizingContext::new(90, 30)
    }

    #[test]
    fn test_empty_set_is_sentinel() {
        let (mut nav, _) = navigator(0);
        assert!(nav.go_to_first(sizing()).is_none());
        assert!(nav.active().is_none());
    }

    #[test]
    fn test_go_to_first() {
        let (mut nav, counters) = navigator(2);
        let follow_up = nav.go_to_first(sizing()).unwrap();
        assert_eq!(follow_up.effects(), &[Effect::SetTitle("s0".into())]);
        assert_eq!(nav.active_index(), Some(0));
        assert_eq!(counters[0].load(Ordering::SeqCst), 1);
        assert_eq!(nav.active().unwrap().render(), "s0");
    }

    #[test]
    fn test_uninitialized_moves_are_sentinel() {
        let (mut nav, counters) = navigator(2);
        assert!(nav.advance(sizing()).is_none());
        assert!(nav.retreat(sizing()).is_none());
        assert_eq!(nav.active_index(), None);
        assert_eq!(counters[0].load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_advance_and_retreat() {
        let (mut nav, counters) = navigator(3);
        nav.go_to_first(sizing());
        nav.advance(sizing()).unwrap();
        nav.advance(SizingContext::new(10, 5)).unwrap();
        assert_eq!(nav.active_index(), Some(2));

        nav.retreat(sizing()).unwrap();
        assert_eq!(nav.active_index(), Some(1));
        assert_eq!(counters[1].load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_advance_past_end_keeps_index() {
        let (mut nav, counters) = navigator(2);
        nav.go_to_first(sizing());
        nav.advance(sizing());
        assert!(nav.advance(sizing()).is_none());
        assert_eq!(nav.active_index(), Some(1));
        assert_eq!(counters[1].load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_retreat_at_first_reinitializes_once() {
        let (mut nav, counters) = navigator(2);
        nav.go_to_first(sizing());
        assert!(nav.retreat(SizingContext::new(40, 10)).is_some());
        assert_eq!(nav.active_index(), Some(0));
        assert_eq!(counters[0].load(Ordering::SeqCst), 2);
        assert_eq!(counters[1].load(Ordering::SeqCst), 0);
    }
}
