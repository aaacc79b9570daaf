//! Screen trait support — screen identifier enum.

use std::fmt;

/// Identifies each TUI screen. Hall of Fame and Popular Cards are
/// navigable by number keys; Player and Round are drill-down targets
/// reached from other screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    HallOfFame, // 1
    PopularCards, // 2
    /// Detail view for one player — no number key.
    Player,
    /// Detail view for one round — no number key.
    Round,
}

impl ScreenId {
    /// Screens in tab-bar order.
    pub const TABS: [ScreenId; 2] = [Self::HallOfFame, Self::PopularCards];

    /// Screen from a numeric key. Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::HallOfFame),
            2 => Some(Self::PopularCards),
            _ => None,
        }
    }

    /// Short label for the tab bar / screen title.
    pub fn label(self) -> &'static str {
        match self {
            Self::HallOfFame => "Hall of Fame",
            Self::PopularCards => "Popular Cards",
            Self::Player => "Player",
            Self::Round => "Round",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
