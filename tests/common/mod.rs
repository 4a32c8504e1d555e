use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use ecopure::config::{Config, DispatchMode};
use ecopure::dispatch::RecordingDispatcher;
use ecopure::geolocation::GeolocationProvider;
use ecopure::metadata::Document;
use ecopure::Storefront;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Config that records dispatches and skips every chat delay
#[allow(dead_code)]
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.dispatch.mode = DispatchMode::Record;
    config.chat.typing_delay_ms = 0;
    config.chat.close_delay_ms = 0;
    config
}

#[allow(dead_code)]
pub fn storefront(
    geolocation: Arc<dyn GeolocationProvider>,
) -> (Storefront, Arc<RecordingDispatcher>) {
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let shop = Storefront::new(
        &fast_config(),
        Document::shared(),
        dispatcher.clone(),
        geolocation,
    );
    (shop, dispatcher)
}
