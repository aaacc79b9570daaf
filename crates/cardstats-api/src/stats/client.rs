// Hand-crafted async HTTP client for the statistics backend.
//
// Every endpoint is a GET returning JSON. The endpoint string is the
// identity of a resource; callers that need caching or stale-result
// handling wrap this client in `cardstats-core`'s RemoteResource.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::types::{HallOfFame, PlayerStats, PopularCard, Round};
use crate::Error;

/// Characters percent-encoded when a player name becomes a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

/// Async client for the tournament statistics backend.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct StatsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StatsClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &crate::TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse the base URL and guarantee a trailing slash so that joining
    /// relative endpoint paths behaves uniformly.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── Generic fetch primitive ──────────────────────────────────────

    /// GET `{base_url}{endpoint}` and decode the JSON body as `T`.
    ///
    /// The endpoint string is treated as opaque; shape enforcement is the
    /// caller's contract with the backend.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, Error> {
        let url = self.base_url.join(endpoint)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    // ── Typed endpoints ──────────────────────────────────────────────

    pub async fn hall_of_fame(&self) -> Result<HallOfFame, Error> {
        self.get_json("hall_of_fame").await
    }

    pub async fn player_stats(&self, name: &str) -> Result<PlayerStats, Error> {
        self.get_json(&Self::player_stats_endpoint(name)).await
    }

    pub async fn round(&self, number: u32) -> Result<Round, Error> {
        self.get_json(&format!("round/{number}")).await
    }

    pub async fn popular_cards(&self) -> Result<Vec<PopularCard>, Error> {
        self.get_json("popular_cards").await
    }

    /// Endpoint string for a player, with the name percent-encoded as a
    /// single path segment.
    pub fn player_stats_endpoint(name: &str) -> String {
        format!("playerstats/{}", utf8_percent_encode(name, PATH_SEGMENT))
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = crate::error::body_preview(&body);
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            let message = resp.text().await.unwrap_or_default();
            Err(Error::Http {
                status: status.as_u16(),
                message: if message.is_empty() {
                    status.to_string()
                } else {
                    message
                },
            })
        }
    }
}
