// Client for the external card-image provider.
//
// Two chained GETs per lookup: an exact-name card fetch, then (when the
// card has multiple printings) the prints-search list it references.
// The provider orders printings newest-first; the LAST element is the
// oldest printing. That ordering is the provider's contract, not ours.

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::Error;

/// Default provider base URL (Scryfall).
pub const DEFAULT_PROVIDER_URL: &str = "https://api.scryfall.com/";

// ── Wire types ──────────────────────────────────────────────────────

/// Card object returned by the exact-name lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedCard {
    #[serde(default)]
    pub name: Option<String>,
    /// Search URI listing every printing of this card, when there are
    /// multiple. Absolute URL into the provider.
    #[serde(default)]
    pub prints_search_uri: Option<Url>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

/// One page of a prints search. Ordered newest-first by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintsPage {
    #[serde(default)]
    pub data: Vec<Printing>,
}

/// A single printing of a card.
#[derive(Debug, Clone, Deserialize)]
pub struct Printing {
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

/// Image URLs at the resolutions the provider offers.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageUris {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub normal: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

/// Which provider resolution to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    Small,
    #[default]
    Normal,
}

impl ImageUris {
    /// The URL for the requested size, falling back to the other
    /// resolutions when the preferred one is missing.
    pub fn url_for(&self, size: ImageSize) -> Option<&str> {
        let preferred = match size {
            ImageSize::Small => &self.small,
            ImageSize::Normal => &self.normal,
        };
        preferred
            .as_deref()
            .or(self.normal.as_deref())
            .or(self.small.as_deref())
            .or(self.large.as_deref())
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// Async client for the card-image provider.
#[derive(Debug, Clone)]
pub struct CardLookupClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CardLookupClient {
    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &crate::TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        let path = base_url.path().trim_end_matches('/').to_owned();
        base_url.set_path(&format!("{path}/"));
        Ok(Self { http, base_url })
    }

    /// Exact-name card lookup: `GET cards/named?exact=<name>`.
    ///
    /// An unknown name yields HTTP 404, which callers treat as a
    /// definitive "no such card".
    pub async fn named_exact(&self, name: &str) -> Result<NamedCard, Error> {
        let url = self.base_url.join("cards/named")?;
        debug!("GET {url} exact={name}");

        let resp = self
            .http
            .get(url)
            .query(&[("exact", name)])
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    /// Follow a prints-search URI from a previous lookup.
    pub async fn prints(&self, uri: &Url) -> Result<PrintsPage, Error> {
        debug!("GET {uri}");

        let resp = self.http.get(uri.clone()).send().await?;
        Self::handle_response(resp).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, Error> {
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
