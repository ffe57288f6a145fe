//! Module providing the hockey cog: NHL lookups (rosters, players, schedules, standings)
//! and per-channel game-update settings.
//! Includes the API request logic and the cog's error type.

use chrono::NaiveDate;
use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::utils::database::StoreError;

/// Converters (team, date, season, timezone, ...) and channel/role helpers.
pub mod helper;
/// `/hockeyset` commands: channel subscriptions, timezone, game-day channels.
pub mod hockeyset;
/// `/hockey` lookup commands.
pub mod lookup;
/// Page sources and embed renderers.
pub mod menus;
/// NHL API response types.
pub mod models;
/// Cached player database.
pub mod players;
/// Static team table.
pub mod teams;

use models::{Game, ScheduleResponse};

/// Custom error type for the hockey cog.
#[derive(Error, Debug)]
pub enum HockeyError {
    /// Error during HTTP request communication.
    #[error("API communication failure: {0}")]
    Api(#[from] reqwest::Error),

    /// Error during JSON parsing.
    #[error("Unable to parse text from JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unable to access cached data: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The API answered with an error status.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("`{0}` is not a valid year.")]
    InvalidYear(String),

    #[error("`{0}` is not a valid date.")]
    InvalidDate(String),

    #[error("You must provide a valid current team.")]
    InvalidTeam,

    #[error("`{0}` is not a valid timezone. Please see `/hockeyset timezone list`.")]
    InvalidTimezone(String),

    #[error("\"{0}\" is not a valid game state.")]
    InvalidState(String),

    #[error("This command can only be used in a server.")]
    GuildOnly,
}

/// Sends a GET request and returns the raw body.
pub(crate) async fn send_raw_request(
    client: &reqwest::Client,
    base_url: &str,
    path: &str,
    query: &[(&str, &str)],
) -> Result<String, HockeyError> {
    let base = Url::parse(base_url)
        .map_err(|e| HockeyError::BadRequest(format!("Invalid base URL '{}': {}", base_url, e)))?;
    let full_url = base.join(path).map_err(|e| {
        HockeyError::BadRequest(format!(
            "Invalid path segment '{}' for base URL '{}': {}",
            path, base_url, e
        ))
    })?;

    debug!("GET {}", full_url);
    let response = client.get(full_url.clone()).query(query).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(HockeyError::BadRequest(format!(
            "{} answered with {}",
            full_url.path(),
            status
        )));
    }

    Ok(response.text().await?)
}

/// Sends a GET request to an NHL endpoint and parses the JSON body.
pub(crate) async fn send_request<T: DeserializeOwned>(
    client: &reqwest::Client,
    base_url: &str,
    path: &str,
    query: &[(&str, &str)],
) -> Result<T, HockeyError> {
    let body = send_raw_request(client, base_url, path, query).await?;
    Ok(serde_json::from_str(&body)?)
}

/// All games scheduled on `date`.
pub(crate) async fn fetch_games(
    client: &reqwest::Client,
    base_url: &str,
    date: NaiveDate,
) -> Result<Vec<Game>, HockeyError> {
    let path = format!("schedule/{}", date.format("%Y-%m-%d"));
    let schedule: ScheduleResponse = send_request(client, base_url, &path, &[]).await?;

    Ok(schedule
        .game_week
        .into_iter()
        .filter(|day| day.date == date)
        .flat_map(|day| day.games)
        .map(Game::from)
        .collect())
}
