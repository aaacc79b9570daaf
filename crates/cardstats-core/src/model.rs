//! Domain model for the statistics pages.
//!
//! The wire types from `cardstats-api` ARE the domain model here — the
//! backend's JSON is already shaped for display — so this module just
//! re-exports them under one roof.

pub use cardstats_api::stats::types::{
    CardCount, Deck, HallOfFame, Nemesis, PlayerStats, PlayerSummary, PopularCard, ResultRow,
    Round, RoundWinners,
};
