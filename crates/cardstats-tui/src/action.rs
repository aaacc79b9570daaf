//! All possible UI actions. Actions are the sole mechanism for state mutation.

use crate::screen::ScreenId;

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,

    // ── Drill-down ────────────────────────────────────────────────
    /// Open the player detail screen for the named player.
    OpenPlayer(String),
    /// Open the round detail screen for the given round number.
    OpenRound(u32),
}
