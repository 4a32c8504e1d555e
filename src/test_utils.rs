//! Test utilities for the storefront
//!
//! Shared fixtures: temporary config files, a configuration without chat
//! delays, and a storefront session wired to a recording dispatcher.

use crate::config::{Config, DispatchMode};
use crate::dispatch::RecordingDispatcher;
use crate::geolocation::{GeolocationProvider, Unsupported};
use crate::metadata::Document;
use crate::storefront::Storefront;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T, E: std::fmt::Display>(result: Result<T, E>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Configuration that records dispatches and never sleeps
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.dispatch.mode = DispatchMode::Record;
    config.chat.typing_delay_ms = 0;
    config.chat.close_delay_ms = 0;
    config
}

/// Storefront session with no location capability
pub fn test_storefront(dispatcher: Arc<RecordingDispatcher>) -> Storefront {
    test_storefront_with(dispatcher, Arc::new(Unsupported))
}

pub fn test_storefront_with(
    dispatcher: Arc<RecordingDispatcher>,
    geolocation: Arc<dyn GeolocationProvider>,
) -> Storefront {
    Storefront::new(&test_config(), Document::shared(), dispatcher, geolocation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: Result<(), String> = Err("Your cart is empty.".to_string());
        assert_error_contains(result, "cart is empty");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        let result: Result<(), String> = Ok(());
        assert_error_contains(result, "error");
    }

    #[test]
    fn test_test_config_is_valid() {
        let config = test_config();
        assert_eq!(config.dispatch.mode, DispatchMode::Record);
        assert!(config.validate().is_ok());
    }
}
