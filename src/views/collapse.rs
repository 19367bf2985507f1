//! Mutually exclusive collapse panels.

/// Number of panels in a collapse section.
pub const PANEL_COUNT: usize = 3;

/// Which panel, if any, is open. At most one panel is open at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollapseState {
    open: Option<usize>,
}

impl CollapseState {
    /// State after clicking `button`: the same button closes its panel,
    /// any other button opens its own panel and closes the rest.
    /// Indices outside `0..PANEL_COUNT` close everything.
    pub fn toggle(self, button: usize) -> Self {
        if button >= PANEL_COUNT {
            return Self::default();
        }
        match self.open {
            Some(open) if open == button => Self { open: None },
            _ => Self { open: Some(button) },
        }
    }

    pub fn open_panel(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, panel: usize) -> bool {
        self.open == Some(panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(state: CollapseState) -> [bool; PANEL_COUNT] {
        std::array::from_fn(|i| state.is_open(i))
    }

    #[test]
    fn starts_closed() {
        assert_eq!(flags(CollapseState::default()), [false, false, false]);
    }

    #[test]
    fn click_opens_then_closes() {
        for i in 0..PANEL_COUNT {
            let open = CollapseState::default().toggle(i);
            assert_eq!(open.open_panel(), Some(i));
            assert_eq!(open.toggle(i), CollapseState::default());
        }
    }

    #[test]
    fn other_button_switches_directly() {
        let first = CollapseState::default().toggle(0);
        let second = first.toggle(2);
        assert_eq!(second.open_panel(), Some(2));
        assert_eq!(flags(second), [false, false, true]);
    }

    #[test]
    fn never_more_than_one_open() {
        let mut state = CollapseState::default();
        for click in [0, 1, 1, 2, 0, 0, 2, 1, 5, 1] {
            state = state.toggle(click);
            assert!(flags(state).iter().filter(|&&open| open).count() <= 1);
        }
    }

    #[test]
    fn unknown_button_closes_all() {
        let state = CollapseState::default().toggle(1).toggle(7);
        assert_eq!(state.open_panel(), None);
    }
}
