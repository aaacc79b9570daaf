//! Component trait — the building block for every screen.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

/// Every screen implements Component.
///
/// Lifecycle: `mount` → (`handle_key_event` | `tick` | `render`)*.
/// Data arrives by polling: screens own their RemoteResources and pull
/// fresh state on every tick.
pub trait Component: Send {
    /// Called when the screen becomes active. Kick off fetches here.
    fn mount(&mut self) -> Result<()> {
        Ok(())
    }

    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Periodic data poll (4 Hz). Pull RemoteResource state changes here.
    fn tick(&mut self) {}

    /// Render into the provided frame area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}
