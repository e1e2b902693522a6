/// The modal's tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Info,
    History,
    Ids,
    Ban,
}

impl Tab {
    pub const ALL: [Self; 4] = [Self::Info, Self::History, Self::Ids, Self::Ban];

    pub fn title(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::History => "History",
            Self::Ids => "IDs",
            Self::Ban => "Ban",
        }
    }

    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.title() == title)
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|tab| *tab == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|tab| *tab == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Which tab is showing. Selection never touches the network; every tab
/// renders from the snapshot already held by the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabRouter {
    active: Tab,
}

impl TabRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    /// Returns whether the selection changed.
    pub fn select(&mut self, tab: Tab) -> bool {
        let changed = self.active != tab;
        self.active = tab;
        changed
    }

    pub fn select_next(&mut self) {
        self.active = self.active.next();
    }

    pub fn select_prev(&mut self) {
        self.active = self.active.prev();
    }

    pub fn reset(&mut self) {
        self.active = Tab::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tab_is_info() {
        assert_eq!(TabRouter::new().active(), Tab::Info);
    }

    #[test]
    fn cycling_wraps_both_ways() {
        assert_eq!(Tab::Ban.next(), Tab::Info);
        assert_eq!(Tab::Info.prev(), Tab::Ban);
        assert_eq!(Tab::History.next(), Tab::Ids);
    }

    #[test]
    fn select_reports_changes_and_reset_returns_to_info() {
        let mut router = TabRouter::new();
        assert!(router.select(Tab::History));
        assert!(!router.select(Tab::History));
        router.select_next();
        assert_eq!(router.active(), Tab::Ids);
        router.reset();
        assert_eq!(router.active(), Tab::Info);
    }

    #[test]
    fn titles_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(Tab::from_title(tab.title()), Some(tab));
        }
        assert_eq!(Tab::Ids.title(), "IDs");
        assert_eq!(Tab::from_title("Notes"), None);
    }
}
