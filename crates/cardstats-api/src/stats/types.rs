//! Wire types for the statistics backend.
//!
//! Field names follow the backend's JSON keys verbatim; the one exception
//! is [`PopularCard::percent`], which the backend serves under the key
//! `"%"`.

use serde::{Deserialize, Serialize};

// ── hall_of_fame ────────────────────────────────────────────────────

/// Response of the `hall_of_fame` endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HallOfFame {
    /// Winners of every round, most recent last.
    pub rounds: Vec<RoundWinners>,
    /// The all-time player table.
    pub table: Vec<PlayerSummary>,
}

/// Winner(s) of a single round. Ties produce multiple names.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoundWinners {
    pub round: u32,
    pub winner: Vec<String>,
}

/// One row of the all-time player table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSummary {
    pub player: String,
    pub rounds_played: u32,
    pub wins: u32,
    pub elo: f64,
    pub score_mean: f64,
    pub score_sum: f64,
}

// ── playerstats/{name} ──────────────────────────────────────────────

/// Response of the `playerstats/{name}` endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerStats {
    /// Most-played cards, descending by count.
    pub cards: Vec<CardCount>,
    pub n_rounds_played: u32,
    pub n_wins: u32,
    pub score_average: f64,
    pub score_total: f64,
    /// Per-round score history, oldest first.
    pub score_list: Vec<f64>,
    pub elo: f64,
    /// Opponents faced most often; the first entry is the nemesis proper.
    pub nemesis: Vec<Nemesis>,
}

/// A card name with a play count.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CardCount {
    pub card: String,
    pub count: u32,
}

/// An opponent summary from the nemesis list.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Nemesis {
    pub player: String,
    pub n_matches: u32,
    pub score: f64,
}

// ── round/{number} ──────────────────────────────────────────────────

/// Response of the `round/{number}` endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Round {
    pub decks: Vec<Deck>,
    pub results: Vec<ResultRow>,
}

/// One submitted deck in a round.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Deck {
    pub index: u32,
    pub player: String,
    pub cards: Vec<String>,
}

/// One row of the round's result matrix.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResultRow {
    pub index: u32,
    pub values: Vec<f64>,
}

// ── popular_cards ───────────────────────────────────────────────────

/// One entry of the `popular_cards` endpoint (a bare JSON array).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PopularCard {
    pub card: String,
    pub count: u32,
    /// Share of all decks this card appears in, in percent.
    #[serde(rename = "%")]
    pub percent: f64,
}
