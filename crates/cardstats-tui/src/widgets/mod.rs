//! Reusable widgets shared across screens.

pub mod card_preview;
pub mod table;
