// ── Card-image resolution service ──
//
// Maps a card name to a display-image URL through the external provider,
// with two layers that keep network traffic minimal:
// - a persistent bounded cache (ImageStore) consulted before any request;
// - an in-flight set guaranteeing at most one outstanding lookup per
//   normalized name. Concurrent requesters for the same name attach to
//   the leader's watch channel instead of fetching themselves.
//
// Failures never propagate: a missing image degrades the page to text.
// Provider 404 means the card does not exist and is cached as NotFound;
// any other failure resolves this attempt to "no image" WITHOUT caching,
// so a transient error can be retried later.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::watch;
use tracing::debug;

use cardstats_api::{CardLookupClient, Error, ImageSize};

use crate::cache::{CardImage, ImageStore};

enum Role {
    Leader(watch::Sender<Option<CardImage>>),
    Follower(watch::Receiver<Option<CardImage>>),
}

/// Removes the in-flight marker when the leader finishes OR when its
/// future is dropped mid-lookup. Without this, a cancelled leader would
/// leave a dead channel behind and the name could never resolve again.
struct InFlightGuard<'a> {
    in_flight: &'a DashMap<String, watch::Receiver<Option<CardImage>>>,
    key: &'a str,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(self.key);
    }
}

/// Shared card-name → image-URL resolver.
///
/// One instance per process, injected into every view that renders card
/// names. Lookups are fetch-once per name; visibility of the image is the
/// caller's concern and never triggers extra fetches.
pub struct CardImageResolver {
    client: CardLookupClient,
    store: ImageStore,
    size: ImageSize,
    in_flight: DashMap<String, watch::Receiver<Option<CardImage>>>,
}

impl CardImageResolver {
    pub fn new(client: CardLookupClient, store: ImageStore, size: ImageSize) -> Self {
        Self {
            client,
            store,
            size,
            in_flight: DashMap::new(),
        }
    }

    /// Normalize a raw card name into a lookup/cache key: strip characters
    /// the provider URL cannot carry and trim whitespace. Deterministic
    /// and idempotent.
    pub fn normalize_name(raw: &str) -> String {
        raw.replace('&', "").trim().to_owned()
    }

    /// Resolve a card name to an image URL, or `None` when no image is
    /// available (unknown card, imageless printing, or a failed attempt).
    pub async fn resolve(&self, raw_name: &str) -> Option<String> {
        let key = Self::normalize_name(raw_name);
        if key.is_empty() {
            return None;
        }

        loop {
            // Cache hit short-circuits the network entirely.
            if let Some(cached) = self.store.get(&key) {
                return cached.url().map(str::to_owned);
            }

            // The entry API makes check-then-claim atomic per key: exactly
            // one caller becomes the leader, everyone else follows its
            // channel.
            let role = match self.in_flight.entry(key.clone()) {
                Entry::Occupied(entry) => Role::Follower(entry.get().clone()),
                Entry::Vacant(entry) => {
                    let (tx, rx) = watch::channel(None);
                    entry.insert(rx);
                    Role::Leader(tx)
                }
            };

            match role {
                Role::Follower(mut rx) => {
                    debug!(card = %key, "attaching to in-flight lookup");
                    match rx.wait_for(Option::is_some).await {
                        Ok(outcome) => {
                            return outcome
                                .clone()
                                .and_then(|image| image.url().map(str::to_owned));
                        }
                        // Leader vanished without broadcasting. Its guard
                        // has cleared the marker; retake leadership.
                        Err(_) => continue,
                    }
                }
                Role::Leader(tx) => {
                    let _guard = InFlightGuard {
                        in_flight: &self.in_flight,
                        key: &key,
                    };

                    // A previous leader may have finished between our cache
                    // miss and claiming the marker — re-check before fetching.
                    let image = match self.store.get(&key) {
                        Some(cached) => cached,
                        None => match self.lookup(&key).await {
                            Ok(image) => {
                                self.store.put(&key, image.clone());
                                image
                            }
                            Err(e) => {
                                debug!(card = %key, error = %e, "card lookup failed, not caching");
                                CardImage::NotFound
                            }
                        },
                    };

                    let _ = tx.send(Some(image.clone()));
                    return image.url().map(str::to_owned);
                }
            }
        }
    }

    /// The backing cache (exposed for tests and shutdown bookkeeping).
    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Two-step provider protocol: exact-name lookup, then the prints
    /// list when the card references one. The provider orders printings
    /// newest-first, so the LAST entry is the oldest printing and wins.
    async fn lookup(&self, name: &str) -> Result<CardImage, Error> {
        let card = match self.client.named_exact(name).await {
            Ok(card) => card,
            // Unknown card name: a definitive, cacheable miss.
            Err(e) if e.is_not_found() => return Ok(CardImage::NotFound),
            Err(e) => return Err(e),
        };

        if let Some(prints_uri) = &card.prints_search_uri {
            let page = self.client.prints(prints_uri).await?;
            let url = page
                .data
                .last()
                .and_then(|oldest| oldest.image_uris.as_ref())
                .and_then(|uris| uris.url_for(self.size));
            return Ok(url.map_or(CardImage::NotFound, |u| CardImage::Found(u.to_owned())));
        }

        // Single printing: use the primary lookup's own image.
        let url = card
            .image_uris
            .as_ref()
            .and_then(|uris| uris.url_for(self.size));
        Ok(url.map_or(CardImage::NotFound, |u| CardImage::Found(u.to_owned())))
    }
}
