// cardstats-core: Client-side data layer between cardstats-api and views.
//
// Three loosely coupled pieces: RemoteResource (fetch-and-publish state
// binding with stale-result discard), CardImageResolver (deduplicated,
// persistently cached card-name -> image-URL resolution), and TableModel
// (column-driven sortable table state). Views own their RemoteResources;
// the resolver is a shared service injected into whoever renders cards.

pub mod cache;
pub mod format;
pub mod model;
pub mod resolver;
pub mod resource;
pub mod table;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{CardImage, ImageStore};
pub use format::{format_stat, pad_score};
pub use resolver::CardImageResolver;
pub use resource::{FetchFailure, RemoteResource, ResourceState};
pub use table::{CellValue, Column, SortDirection, TableModel};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    CardCount, Deck, HallOfFame, Nemesis, PlayerStats, PlayerSummary, PopularCard, ResultRow,
    Round, RoundWinners,
};
