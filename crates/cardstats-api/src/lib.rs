// cardstats-api: Async HTTP clients for the statistics backend and the
// card-image provider. Both speak plain GET + JSON; `cardstats-core`
// layers caching, dedup, and state machines on top.

pub mod cards;
pub mod error;
pub mod stats;
pub mod transport;

pub use cards::{CardLookupClient, ImageSize, ImageUris, NamedCard, Printing, PrintsPage};
pub use error::{Error, ErrorKind};
pub use stats::StatsClient;
pub use transport::TransportConfig;
