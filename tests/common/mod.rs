//! Common test utilities and fixtures shared by the integration tests.

pub mod fixtures;

use std::{path::PathBuf, sync::Once};

use cogbot::utils::config::Settings;
use tracing::Level;

static INIT: Once = Once::new();

/// Initializes tracing once for the whole test binary.
pub fn init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// A scratch directory unique to `name` and this test process, emptied first.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cogbot-it-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// Default settings with every cache and the store under a scratch directory.
pub fn scratch_settings(name: &str) -> Settings {
    let dir = scratch_dir(name);
    Settings {
        database_path: dir.join("config.db"),
        data_dir: dir,
        ..Settings::default()
    }
}
