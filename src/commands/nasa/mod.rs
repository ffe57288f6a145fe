//! Module providing the NASA cog: image library search, APOD, Mars rover
//! manifests and photos, EONET natural events and EPIC earth imagery.
//! Includes the API request logic and the cog's error type.

use std::sync::LazyLock;

use dashmap::DashMap;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// `/nasa` commands.
pub mod lookup;
/// Page sources for every NASA menu.
pub mod menus;
/// API response types.
pub mod models;

/// Custom error type for the NASA cog.
#[derive(Error, Debug)]
pub enum NasaError {
    /// Error during HTTP request communication.
    #[error("API communication failure: {0}")]
    Api(#[from] reqwest::Error),

    /// Error during JSON parsing.
    #[error("Unable to parse text from JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with an error, carrying its message when it gave one.
    #[error("NASA API error: {0}")]
    BadRequest(String),

    #[error("`{0}` is not a valid date. Use the format YYYY-MM-DD.")]
    InvalidDate(String),
}

/// Links of video assets already looked up, keyed by the item's asset list URL.
static VIDEO_LINKS: LazyLock<DashMap<String, Option<String>>> = LazyLock::new(DashMap::new);

/// Pulls a readable message out of an error body: `msg`, `error.message` or `error`.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value["msg"]
        .as_str()
        .or_else(|| value["error"]["message"].as_str())
        .or_else(|| value["error"].as_str())
        .map(str::to_string)
}

async fn get<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: Url,
    query: &[(&str, String)],
    api_key: Option<&str>,
) -> Result<T, NasaError> {
    debug!("GET {}", url);
    let mut request = client.get(url.clone()).query(query);
    if let Some(key) = api_key {
        request = request.query(&[("api_key", key)]);
    }

    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = error_message(&body).unwrap_or_else(|| status.to_string());
        warn!("{} answered {}: {}", url.path(), status, message);
        return Err(NasaError::BadRequest(message));
    }

    Ok(serde_json::from_str(&body)?)
}

/// Sends a GET request to `path` under `base_url`. The API key is sent only when given,
/// which callers do for api.nasa.gov alone.
pub(crate) async fn send_request<T: DeserializeOwned>(
    client: &reqwest::Client,
    base_url: &str,
    path: &str,
    query: &[(&str, String)],
    api_key: Option<&str>,
) -> Result<T, NasaError> {
    let base = Url::parse(base_url)
        .map_err(|e| NasaError::BadRequest(format!("Invalid base URL '{}': {}", base_url, e)))?;
    let full_url = base.join(path).map_err(|e| {
        NasaError::BadRequest(format!(
            "Invalid path segment '{}' for base URL '{}': {}",
            path, base_url, e
        ))
    })?;

    get(client, full_url, query, api_key).await
}

/// The original mp4 of an image library video, looked up from the item's asset list.
pub(crate) async fn fetch_video_url(
    client: &reqwest::Client,
    asset_list: &str,
) -> Result<Option<String>, NasaError> {
    if let Some(cached) = VIDEO_LINKS.get(asset_list) {
        debug!("Video link cache hit for {}", asset_list);
        return Ok(cached.value().clone());
    }

    let url = Url::parse(asset_list)
        .map_err(|e| NasaError::BadRequest(format!("Invalid asset list URL '{}': {}", asset_list, e)))?;
    let links: Vec<String> = get(client, url, &[], None).await?;
    let video = links
        .iter()
        .rev()
        .find(|link| link.ends_with("orig.mp4"))
        .map(|link| link.replace(' ', "%20"));

    VIDEO_LINKS.insert(asset_list.to_string(), video.clone());
    Ok(video)
}
