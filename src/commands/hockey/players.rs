//! The NHL records player database, cached on disk and refreshed once it goes stale.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::{debug, info};

use super::{
    HockeyError,
    models::{BasePlayer, PlayerDatabase, RecordPlayer},
    send_raw_request,
};
use crate::utils::{config::Settings, database::ConfigStore};

/// Global setting key holding the unix time of the last refresh.
pub const PLAYER_DB_KEY: &str = "player_db";

pub fn players_path(settings: &Settings) -> PathBuf {
    settings.data_dir.join("hockey").join("players.json")
}

/// Whether a refresh recorded at `saved` (unix seconds) is older than `ttl` at `now`.
fn is_stale(saved: Option<i64>, now: DateTime<Utc>, ttl: std::time::Duration) -> bool {
    let Some(saved) = saved.and_then(|ts| DateTime::from_timestamp(ts, 0)) else {
        return true;
    };
    match chrono::Duration::from_std(ttl) {
        Ok(ttl) => now - saved > ttl,
        Err(_) => false,
    }
}

/// Loads every player, downloading a fresh copy first when the cache is stale or missing.
pub async fn load_players(
    client: &reqwest::Client,
    settings: &Settings,
    store: &ConfigStore,
    now: DateTime<Utc>,
) -> Result<Vec<BasePlayer>, HockeyError> {
    let path = players_path(settings);
    let saved: Option<i64> = store.get_global(PLAYER_DB_KEY)?;

    let body = if is_stale(saved, now, settings.player_cache_ttl) || !fs::try_exists(&path).await? {
        info!("Refreshing player database into {}", path.display());
        let body = send_raw_request(
            client,
            &settings.endpoints.nhl_records,
            "player",
            &[
                ("include", "id"),
                ("include", "fullName"),
                ("include", "onRoster"),
            ],
        )
        .await?;
        // Make sure it parses before it replaces the cache.
        serde_json::from_str::<PlayerDatabase>(&body)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &body).await?;
        store.set_global(PLAYER_DB_KEY, &now.timestamp())?;
        body
    } else {
        debug!("Using cached player database at {}", path.display());
        fs::read_to_string(&path).await?
    };

    let database: PlayerDatabase = serde_json::from_str(&body)?;
    Ok(database
        .data
        .into_iter()
        .filter_map(RecordPlayer::into_base)
        .collect())
}

/// Players whose name contains `argument`, case-insensitively. Players on a
/// roster come first; order within each group is kept.
pub fn find_players(players: &[BasePlayer], argument: &str) -> Vec<BasePlayer> {
    let needle = argument.to_lowercase();
    let (mut on_roster, retired): (Vec<BasePlayer>, Vec<BasePlayer>) = players
        .iter()
        .filter(|player| player.name.to_lowercase().contains(&needle))
        .cloned()
        .partition(|player| player.on_roster);
    on_roster.extend(retired);
    on_roster
}

/// Autocomplete values for a player argument.
pub fn player_autocomplete(players: &[BasePlayer], current: &str) -> Vec<String> {
    let needle = current.to_lowercase();
    players
        .iter()
        .filter(|player| player.name.to_lowercase().contains(&needle))
        .map(|player| player.name.clone())
        .take(25)
        .collect()
}
