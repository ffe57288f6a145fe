use std::time::Duration;

use assert_matches::assert_matches;
use cogbot::{
    Data,
    utils::config::{ConfigError, Settings},
};
use pretty_assertions::assert_eq;
use tokio_test::assert_ok;

use crate::common;

#[test]
fn test_settings_from_lookup() {
    let dir = common::scratch_dir("lookup");
    let data_dir = dir.display().to_string();
    let settings = Settings::from_lookup(|key| match key {
        "DATA_DIR" => Some(data_dir.clone()),
        "NASA_API_KEY" => Some("abc123".to_string()),
        "MENU_TIMEOUT" => Some("5m".to_string()),
        "EONET_API_URL" => Some("http://localhost:9000/".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(settings.nasa_api_key, "abc123");
    assert_eq!(settings.menu_timeout, Duration::from_secs(300));
    assert_eq!(settings.database_path, dir.join("config.db"));
    assert_eq!(settings.endpoints.eonet, "http://localhost:9000/");
    assert_eq!(settings.endpoints.nasa, "https://api.nasa.gov/");
}

#[test]
fn test_bad_duration_is_rejected() {
    let result = Settings::from_lookup(|key| (key == "PLAYER_CACHE_TTL").then(|| "soon".to_string()));
    assert_matches!(result, Err(ConfigError::InvalidDuration { key: "PLAYER_CACHE_TTL", .. }));
}

#[test]
fn test_data_creates_the_store() {
    let settings = common::scratch_settings("data-new");
    let data = assert_ok!(Data::new(settings.clone()));
    assert!(settings.database_path.exists());
    assert_eq!(data.store.path(), settings.database_path.as_path());
}
