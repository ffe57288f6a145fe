//! Runtime settings, read from the environment (after `.env` has been loaded).

use std::{path::PathBuf, time::Duration};

use humantime_serde::re::humantime;
use thiserror::Error;

/// Public NHL web API (schedule, rosters, standings).
pub const NHL_API: &str = "https://api-web.nhle.com/v1/";
/// NHL records API (full player database).
pub const NHL_RECORDS_API: &str = "https://records.nhl.com/site/api/";
/// api.nasa.gov, the only endpoint that takes the API key.
pub const NASA_API: &str = "https://api.nasa.gov/";
pub const NASA_IMAGES_API: &str = "https://images-api.nasa.gov/";
pub const EONET_API: &str = "https://eonet.gsfc.nasa.gov/api/v3/";
pub const EPIC_ARCHIVE: &str = "https://epic.gsfc.nasa.gov/archive/";

const DEFAULT_MENU_TIMEOUT: Duration = Duration::from_secs(180);
const DEFAULT_PLAYER_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 24);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid duration for {key}: {source}")]
    InvalidDuration {
        key: &'static str,
        source: humantime::DurationError,
    },
}

/// Base URLs of every third-party API the cogs talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub nhl: String,
    pub nhl_records: String,
    pub nasa: String,
    pub nasa_images: String,
    pub eonet: String,
    pub epic_archive: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            nhl: NHL_API.to_string(),
            nhl_records: NHL_RECORDS_API.to_string(),
            nasa: NASA_API.to_string(),
            nasa_images: NASA_IMAGES_API.to_string(),
            eonet: EONET_API.to_string(),
            epic_archive: EPIC_ARCHIVE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub nasa_api_key: String,
    /// Root directory for cached JSON blobs.
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    /// Inactivity timeout of paginated menus.
    pub menu_timeout: Duration,
    /// How long the cached player database stays fresh.
    pub player_cache_ttl: Duration,
    pub endpoints: Endpoints,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = PathBuf::from("data");
        Self {
            nasa_api_key: "DEMO_KEY".to_string(),
            database_path: data_dir.join("config.db"),
            data_dir,
            menu_timeout: DEFAULT_MENU_TIMEOUT,
            player_cache_ttl: DEFAULT_PLAYER_CACHE_TTL,
            endpoints: Endpoints::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup; unset or empty keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Settings::default();

        let data_dir = get("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir);
        let database_path = get("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("config.db"));

        let duration = |key: &'static str, default: Duration| match get(key) {
            Some(raw) => humantime::parse_duration(raw.trim())
                .map_err(|source| ConfigError::InvalidDuration { key, source }),
            None => Ok(default),
        };

        let endpoints = Endpoints {
            nhl: get("NHL_API_URL").unwrap_or(defaults.endpoints.nhl),
            nhl_records: get("NHL_RECORDS_URL").unwrap_or(defaults.endpoints.nhl_records),
            nasa: get("NASA_API_URL").unwrap_or(defaults.endpoints.nasa),
            nasa_images: get("NASA_IMAGES_URL").unwrap_or(defaults.endpoints.nasa_images),
            eonet: get("EONET_API_URL").unwrap_or(defaults.endpoints.eonet),
            epic_archive: get("EPIC_ARCHIVE_URL").unwrap_or(defaults.endpoints.epic_archive),
        };

        Ok(Self {
            nasa_api_key: get("NASA_API_KEY").unwrap_or(defaults.nasa_api_key),
            menu_timeout: duration("MENU_TIMEOUT", defaults.menu_timeout)?,
            player_cache_ttl: duration("PLAYER_CACHE_TTL", defaults.player_cache_ttl)?,
            data_dir,
            database_path,
            endpoints,
        })
    }
}
