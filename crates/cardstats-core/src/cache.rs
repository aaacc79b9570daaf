// ── Persistent card-image cache ──
//
// Bounded LRU mapping normalized card name -> image URL (or a definitive
// "not found"). The disk format mirrors the browser-era contract: one JSON
// object whose keys are `cardImage_<name>` and whose values are either the
// URL string or the `__not_found__` sentinel. Key order in the file is
// recency order, oldest first, so LRU state survives restarts.
//
// Persistence is best-effort: a write failure is logged and the process
// carries on with the in-memory state.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use indexmap::IndexMap;
use tracing::{debug, warn};

/// Cached outcome for a normalized card name. Entries are immutable once
/// written; a `NotFound` is as definitive as a `Found`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardImage {
    Found(String),
    NotFound,
}

impl CardImage {
    /// The image URL, if this outcome carries one.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Found(url) => Some(url),
            Self::NotFound => None,
        }
    }
}

/// Disk key prefix, kept from the original localStorage contract.
const KEY_PREFIX: &str = "cardImage_";

/// Serialized marker for a definitive "no image exists" outcome.
const NOT_FOUND_MARKER: &str = "__not_found__";

/// Default maximum number of cached names.
pub const DEFAULT_CAPACITY: usize = 512;

/// Bounded, optionally persistent LRU store for card-image outcomes.
///
/// All operations are synchronous and never held across an await point;
/// a plain mutex suffices.
pub struct ImageStore {
    entries: Mutex<IndexMap<String, CardImage>>,
    path: Option<PathBuf>,
    capacity: usize,
}

impl ImageStore {
    /// Purely in-memory store (tests, or persistence disabled).
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(IndexMap::new()),
            path: None,
            capacity: capacity.max(1),
        }
    }

    /// Open a store backed by the given file, loading any existing
    /// entries. A missing or unreadable file starts the store empty.
    pub fn open(path: PathBuf, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let entries = match Self::load(&path) {
            Some(mut loaded) => {
                // Keep the most recent entries if the file exceeds capacity.
                while loaded.len() > capacity {
                    loaded.shift_remove_index(0);
                }
                loaded
            }
            None => IndexMap::new(),
        };

        Self {
            entries: Mutex::new(entries),
            path: Some(path),
            capacity,
        }
    }

    /// Look up a cached outcome, marking the entry most-recently-used.
    pub fn get(&self, key: &str) -> Option<CardImage> {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let image = entries.shift_remove(key)?;
        entries.insert(key.to_owned(), image.clone());
        Some(image)
    }

    /// Insert an outcome, evicting least-recently-used entries past
    /// capacity, then persist.
    pub fn put(&self, key: &str, image: CardImage) {
        let snapshot = {
            let mut entries =
                self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            entries.shift_remove(key);
            entries.insert(key.to_owned(), image);
            while entries.len() > self.capacity {
                entries.shift_remove_index(0);
            }
            self.path.is_some().then(|| entries.clone())
        };

        if let (Some(path), Some(snapshot)) = (&self.path, snapshot) {
            if let Err(e) = Self::persist(path, &snapshot) {
                warn!(path = %path.display(), error = %e, "failed to persist image cache");
            }
        }
    }

    /// Number of cached names.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Disk I/O ─────────────────────────────────────────────────────

    fn load(path: &Path) -> Option<IndexMap<String, CardImage>> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read image cache");
                return None;
            }
        };

        let parsed: IndexMap<String, String> = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "image cache is corrupt, starting empty");
                return None;
            }
        };

        let entries = parsed
            .into_iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(KEY_PREFIX)?.to_owned();
                let image = if value == NOT_FOUND_MARKER {
                    CardImage::NotFound
                } else {
                    CardImage::Found(value)
                };
                Some((name, image))
            })
            .collect::<IndexMap<_, _>>();

        debug!(path = %path.display(), entries = entries.len(), "loaded image cache");
        Some(entries)
    }

    fn persist(path: &Path, entries: &IndexMap<String, CardImage>) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let on_disk: IndexMap<String, &str> = entries
            .iter()
            .map(|(name, image)| {
                let value = image.url().unwrap_or(NOT_FOUND_MARKER);
                (format!("{KEY_PREFIX}{name}"), value)
            })
            .collect();
        let body = serde_json::to_string_pretty(&on_disk)?;

        // Atomic replace: write a sibling temp file, then rename over.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn get_miss_returns_none() {
        let store = ImageStore::in_memory(4);
        assert!(store.get("Lightning Bolt").is_none());
    }

    #[test]
    fn put_then_get_round_trips_both_outcomes() {
        let store = ImageStore::in_memory(4);
        store.put("Lightning Bolt", CardImage::Found("http://img/bolt.jpg".into()));
        store.put("No Such Card", CardImage::NotFound);

        assert_eq!(
            store.get("Lightning Bolt").unwrap().url(),
            Some("http://img/bolt.jpg")
        );
        assert_eq!(store.get("No Such Card").unwrap(), CardImage::NotFound);
    }

    #[test]
    fn evicts_least_recently_used() {
        let store = ImageStore::in_memory(2);
        store.put("a", CardImage::Found("ua".into()));
        store.put("b", CardImage::Found("ub".into()));

        // Touch "a" so "b" becomes the eviction candidate.
        assert!(store.get("a").is_some());
        store.put("c", CardImage::Found("uc".into()));

        assert!(store.get("b").is_none());
        assert!(store.get("a").is_some());
        assert!(store.get("c").is_some());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card_images.json");

        {
            let store = ImageStore::open(path.clone(), 8);
            store.put("Lightning Bolt", CardImage::Found("http://img/bolt.jpg".into()));
            store.put("No Such Card", CardImage::NotFound);
        }

        let reloaded = ImageStore::open(path.clone(), 8);
        assert_eq!(
            reloaded.get("Lightning Bolt").unwrap().url(),
            Some("http://img/bolt.jpg")
        );
        assert_eq!(reloaded.get("No Such Card").unwrap(), CardImage::NotFound);

        // Disk format: prefixed keys, sentinel for NotFound.
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            parsed["cardImage_Lightning Bolt"],
            serde_json::json!("http://img/bolt.jpg")
        );
        assert_eq!(parsed["cardImage_No Such Card"], serde_json::json!("__not_found__"));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card_images.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = ImageStore::open(path, 8);
        assert!(store.is_empty());
    }

    #[test]
    fn reload_truncates_to_capacity_keeping_most_recent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card_images.json");

        {
            let store = ImageStore::open(path.clone(), 8);
            store.put("a", CardImage::Found("ua".into()));
            store.put("b", CardImage::Found("ub".into()));
            store.put("c", CardImage::Found("uc".into()));
        }

        let reloaded = ImageStore::open(path, 2);
        assert!(reloaded.get("a").is_none());
        assert!(reloaded.get("b").is_some());
        assert!(reloaded.get("c").is_some());
    }
}
