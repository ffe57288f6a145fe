//! Provides the key-value settings store used by the cogs.
//! Values are JSON-encoded and live in one of three scopes: global, per guild, or per channel.

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Serialize, de::DeserializeOwned};
use serenity::model::id::{ChannelId, GuildId};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database failure: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unable to create the database directory: {0}")]
    Io(#[from] std::io::Error),
}

type StoreResult<T> = Result<T, StoreError>;

/// Handle to the SQLite settings database. Each call opens its own connection.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Opens (creating if needed) the store at `path` and makes sure its tables exist.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let store = Self { path };
        store.create_tables()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> rusqlite::Result<Connection> {
        Connection::open(&self.path)
    }

    fn create_tables(&self) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS global_settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS guild_settings (
                guild_id INTEGER NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (guild_id, key)
            );
            CREATE TABLE IF NOT EXISTS channel_settings (
                channel_id INTEGER PRIMARY KEY,
                guild_id INTEGER,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn get_global<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let conn = self.connect()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM global_settings WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        decode(raw)
    }

    pub fn set_global<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR REPLACE INTO global_settings (key, value) VALUES (?1, ?2)",
            params![key, serde_json::to_string(value)?],
        )?;
        debug!("Stored global setting '{}'", key);
        Ok(())
    }

    pub fn clear_global(&self, key: &str) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute("DELETE FROM global_settings WHERE key = ?1", [key])?;
        Ok(())
    }

    pub fn get_guild<T: DeserializeOwned>(
        &self,
        guild_id: GuildId,
        key: &str,
    ) -> StoreResult<Option<T>> {
        let conn = self.connect()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM guild_settings WHERE guild_id = ?1 AND key = ?2",
                params![guild_id.get(), key],
                |row| row.get(0),
            )
            .optional()?;
        decode(raw)
    }

    pub fn set_guild<T: Serialize>(&self, guild_id: GuildId, key: &str, value: &T) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR REPLACE INTO guild_settings (guild_id, key, value) VALUES (?1, ?2, ?3)",
            params![guild_id.get(), key, serde_json::to_string(value)?],
        )?;
        debug!("Stored setting '{}' for guild {}", key, guild_id);
        Ok(())
    }

    pub fn clear_guild(&self, guild_id: GuildId, key: &str) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "DELETE FROM guild_settings WHERE guild_id = ?1 AND key = ?2",
            params![guild_id.get(), key],
        )?;
        Ok(())
    }

    pub fn get_channel<T: DeserializeOwned>(&self, channel_id: ChannelId) -> StoreResult<Option<T>> {
        let conn = self.connect()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM channel_settings WHERE channel_id = ?1",
                params![channel_id.get()],
                |row| row.get(0),
            )
            .optional()?;
        decode(raw)
    }

    /// Stores the settings of a channel; `guild_id` is kept alongside so the guild's channels can be listed.
    pub fn set_channel<T: Serialize>(
        &self,
        channel_id: ChannelId,
        guild_id: Option<GuildId>,
        value: &T,
    ) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR REPLACE INTO channel_settings (channel_id, guild_id, value) VALUES (?1, ?2, ?3)",
            params![
                channel_id.get(),
                guild_id.map(|id| id.get()),
                serde_json::to_string(value)?
            ],
        )?;
        debug!("Stored settings for channel {}", channel_id);
        Ok(())
    }

    pub fn clear_channel(&self, channel_id: ChannelId) -> StoreResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "DELETE FROM channel_settings WHERE channel_id = ?1",
            params![channel_id.get()],
        )?;
        Ok(())
    }

    /// Every configured channel of a guild, in channel id order.
    pub fn channels_in_guild<T: DeserializeOwned>(
        &self,
        guild_id: GuildId,
    ) -> StoreResult<Vec<(ChannelId, T)>> {
        let conn = self.connect()?;
        let mut statement = conn.prepare(
            "SELECT channel_id, value FROM channel_settings WHERE guild_id = ?1 ORDER BY channel_id",
        )?;
        let rows = statement.query_map(params![guild_id.get()], |row| {
            Ok((row.get::<_, u64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut channels = Vec::new();
        for row in rows {
            let (channel_id, raw) = row?;
            channels.push((ChannelId::new(channel_id), serde_json::from_str(&raw)?));
        }
        Ok(channels)
    }
}

fn decode<T: DeserializeOwned>(raw: Option<String>) -> StoreResult<Option<T>> {
    raw.map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(StoreError::from)
}

/// Module containing tests for the settings store.
#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    /// Test helper: opens a fresh store in a unique temporary directory.
    fn setup_store(name: &str) -> ConfigStore {
        let dir = std::env::temp_dir().join(format!("cogbot-store-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        ConfigStore::open(dir.join("nested").join("config.db")).expect("Failed to open store")
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Subscription {
        teams: Vec<String>,
        guild_id: Option<u64>,
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = setup_store("missing");
        let value: Option<i64> = store.get_global("player_db").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_global_round_trip_and_clear() {
        let store = setup_store("global");
        store.set_global("player_db", &1_700_000_000i64).unwrap();
        assert_eq!(store.get_global::<i64>("player_db").unwrap(), Some(1_700_000_000));

        store.set_global("player_db", &1_800_000_000i64).unwrap();
        assert_eq!(store.get_global::<i64>("player_db").unwrap(), Some(1_800_000_000));

        store.clear_global("player_db").unwrap();
        assert_eq!(store.get_global::<i64>("player_db").unwrap(), None);
    }

    #[test]
    fn test_guild_scope_is_isolated() {
        let store = setup_store("guild");
        let first = GuildId::new(1);
        let second = GuildId::new(2);

        store.set_guild(first, "timezone", &"US/Eastern").unwrap();

        assert_eq!(
            store.get_guild::<String>(first, "timezone").unwrap().as_deref(),
            Some("US/Eastern")
        );
        assert_eq!(store.get_guild::<String>(second, "timezone").unwrap(), None);

        store.clear_guild(first, "timezone").unwrap();
        assert_eq!(store.get_guild::<String>(first, "timezone").unwrap(), None);
    }

    #[test]
    fn test_channels_listed_per_guild() {
        let store = setup_store("channels");
        let guild = GuildId::new(10);
        let value = Subscription {
            teams: vec!["Boston Bruins".into()],
            guild_id: Some(10),
        };

        store.set_channel(ChannelId::new(300), Some(guild), &value).unwrap();
        store.set_channel(ChannelId::new(200), Some(guild), &value).unwrap();
        store.set_channel(ChannelId::new(100), Some(GuildId::new(11)), &value).unwrap();
        store.set_channel(ChannelId::new(400), None, &value).unwrap();

        let channels: Vec<(ChannelId, Subscription)> = store.channels_in_guild(guild).unwrap();
        let ids: Vec<u64> = channels.iter().map(|(id, _)| id.get()).collect();
        assert_eq!(ids, vec![200, 300]);
        assert_eq!(channels[0].1, value);

        store.clear_channel(ChannelId::new(200)).unwrap();
        assert_eq!(store.get_channel::<Subscription>(ChannelId::new(200)).unwrap(), None);
        assert_eq!(store.get_channel::<Subscription>(ChannelId::new(400)).unwrap(), Some(value));
    }

    #[test]
    fn test_corrupt_value_is_reported() {
        let store = setup_store("corrupt");
        let conn = Connection::open(store.path()).unwrap();
        conn.execute(
            "INSERT INTO global_settings (key, value) VALUES ('teams', 'not json')",
            [],
        )
        .unwrap();

        let result = store.get_global::<Vec<String>>("teams");
        assert!(matches!(result, Err(StoreError::Json(_))));
    }
}
