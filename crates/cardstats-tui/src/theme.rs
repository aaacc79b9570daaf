//! Visual styling shared across screens.

use ratatui::style::{Color, Modifier, Style};

pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn border_default() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn border_focused() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn table_row() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn selected_row() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

pub fn selected_column() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

pub fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}
