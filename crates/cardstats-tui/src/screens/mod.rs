//! Screen implementations — one module per screen.

pub mod hall_of_fame;
pub mod player;
pub mod popular_cards;
pub mod round;

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::theme;

/// One-line status strip at the bottom of a screen: loading spinner text,
/// the last fetch error, or the key hints.
pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    loading: bool,
    failure: Option<&str>,
    hints: &str,
) {
    let line = if loading {
        Line::from(Span::styled("loading…", theme::dim()))
    } else if let Some(message) = failure {
        Line::from(Span::styled(
            format!("error: {message} (r to retry)"),
            theme::error_style(),
        ))
    } else {
        Line::from(Span::styled(hints, theme::dim()))
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Move a selection index within `len` rows, clamped to the ends.
pub fn move_selection(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}
