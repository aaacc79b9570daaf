//! Shared configuration for the cardstats terminal client.
//!
//! TOML file + environment overrides via figment, translated into the
//! client settings `cardstats-api` and `cardstats-core` consume. Layering,
//! lowest precedence first: built-in defaults, then
//! `$CONFIG_DIR/cardstats/config.toml`, then `CARDSTATS_*` env vars.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use cardstats_api::{ImageSize, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config structs ──────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Base URL of the statistics backend.
    #[serde(default = "default_stats_url")]
    pub stats_url: String,

    /// Base URL of the card-image provider.
    #[serde(default = "default_card_provider_url")]
    pub card_provider_url: String,

    /// Per-request timeout in seconds for both external surfaces.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Card image resolution: `"normal"` or `"small"`.
    #[serde(default = "default_image_size")]
    pub image_size: String,

    /// Card-image cache settings.
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Settings for the persistent card-image cache.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheSettings {
    /// Maximum number of cached card names.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Cache file path. `None` picks the per-user cache directory;
    /// an explicitly empty string disables persistence.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_stats_url() -> String {
    "http://127.0.0.1:5000/".to_owned()
}

fn default_card_provider_url() -> String {
    cardstats_api::cards::DEFAULT_PROVIDER_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_image_size() -> String {
    "normal".to_owned()
}

fn default_cache_capacity() -> usize {
    512
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stats_url: default_stats_url(),
            card_provider_url: default_card_provider_url(),
            timeout_secs: default_timeout_secs(),
            image_size: default_image_size(),
            cache: CacheSettings::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            file: None,
        }
    }
}

// ── Derived settings ────────────────────────────────────────────────

impl Config {
    /// Transport settings for both HTTP clients.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            ..TransportConfig::default()
        }
    }

    /// Parse the configured image resolution.
    pub fn image_size(&self) -> Result<ImageSize, ConfigError> {
        match self.image_size.as_str() {
            "normal" => Ok(ImageSize::Normal),
            "small" => Ok(ImageSize::Small),
            other => Err(ConfigError::Validation {
                field: "image_size".to_owned(),
                reason: format!("expected \"normal\" or \"small\", got {other:?}"),
            }),
        }
    }

    /// Resolve the cache file path: configured path, or the per-user
    /// cache directory, or `None` when persistence is disabled.
    pub fn cache_file(&self) -> Option<PathBuf> {
        match &self.cache.file {
            Some(path) if path.as_os_str().is_empty() => None,
            Some(path) => Some(path.clone()),
            None => default_cache_file(),
        }
    }
}

// ── Loading ─────────────────────────────────────────────────────────

/// Path of the user config file, if a home directory exists.
pub fn config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cardstats").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Default on-disk location of the card-image cache.
pub fn default_cache_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cardstats").map(|dirs| dirs.cache_dir().join("card_images.json"))
}

/// Load configuration: defaults ← config file ← `CARDSTATS_*` env vars.
/// Nested cache keys use a double underscore (`CARDSTATS_CACHE__CAPACITY`).
pub fn load_config() -> Result<Config, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(path) = config_file() {
        debug!(path = %path.display(), "layering config file");
        figment = figment.merge(Toml::file(path));
    }

    let config: Config = figment
        .merge(Env::prefixed("CARDSTATS_").split("__"))
        .extract()?;

    // Fail early on unparseable values rather than at first use.
    config.image_size()?;

    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.stats_url, "http://127.0.0.1:5000/");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.cache.capacity, 512);
        assert_eq!(config.image_size().unwrap(), ImageSize::Normal);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config: Config = toml::from_str(
            r#"
            stats_url = "https://stats.example.org/"
            image_size = "small"

            [cache]
            capacity = 64
            "#,
        )
        .unwrap();

        assert_eq!(config.stats_url, "https://stats.example.org/");
        assert_eq!(config.image_size().unwrap(), ImageSize::Small);
        assert_eq!(config.cache.capacity, 64);
        // Unset fields keep their defaults.
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn invalid_image_size_is_a_validation_error() {
        let config = Config {
            image_size: "huge".to_owned(),
            ..Config::default()
        };
        assert!(matches!(
            config.image_size(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn empty_cache_file_disables_persistence() {
        let config = Config {
            cache: CacheSettings {
                capacity: 512,
                file: Some(PathBuf::new()),
            },
            ..Config::default()
        };
        assert_eq!(config.cache_file(), None);
    }

    #[test]
    fn env_vars_override_file_and_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CARDSTATS_STATS_URL", "http://10.0.0.2:5000/");
            jail.set_env("CARDSTATS_CACHE__CAPACITY", "32");

            let config = load_config().expect("config should load");
            assert_eq!(config.stats_url, "http://10.0.0.2:5000/");
            assert_eq!(config.cache.capacity, 32);
            Ok(())
        });
    }
}
