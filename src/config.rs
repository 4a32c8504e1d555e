//! Configuration management for the storefront
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//!
//! Business facts (product, prices, phone numbers) are compile-time data in
//! [`crate::catalog`]; this file only tunes how the storefront behaves at
//! runtime: where links go, how the chat paces itself, and where location
//! comes from.

use crate::error::{Result, StorefrontError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Message dispatch settings
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Guided chat pacing and transcript bounds
    #[serde(default)]
    pub chat: ChatConfig,
    /// Location autofill source
    #[serde(default)]
    pub geolocation: GeolocationConfig,
    /// Page-level settings
    #[serde(default)]
    pub storefront: StorefrontConfig,
}

/// How dispatched links are opened
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Launch the platform URL opener
    #[default]
    Browser,
    /// Print the link and message to stdout
    Print,
    /// Keep links in memory only
    Record,
}

impl DispatchMode {
    /// Parse a dispatch mode from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use ecopure::config::DispatchMode;
    ///
    /// assert_eq!(DispatchMode::parse_str("PRINT").unwrap(), DispatchMode::Print);
    /// assert!(DispatchMode::parse_str("email").is_err());
    /// ```
    pub fn parse_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "browser" | "open" => Ok(Self::Browser),
            "print" | "stdout" => Ok(Self::Print),
            "record" | "dry-run" => Ok(Self::Record),
            other => Err(format!("Unknown dispatch mode: {}", other)),
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Browser => write!(f, "browser"),
            Self::Print => write!(f, "print"),
            Self::Record => write!(f, "record"),
        }
    }
}

/// Dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Messaging deep-link base, e.g. `https://wa.me`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub mode: DispatchMode,
}

fn default_base_url() -> String {
    crate::dispatch::DEFAULT_BASE_URL.to_string()
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            mode: DispatchMode::default(),
        }
    }
}

/// Guided chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Simulated typing delay before each delayed bot reply
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,

    /// Delay before the panel closes after the inquiry is sent
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,

    /// Maximum transcript entries kept in memory
    #[serde(default = "default_transcript_capacity")]
    pub transcript_capacity: usize,
}

fn default_typing_delay_ms() -> u64 {
    500
}

fn default_close_delay_ms() -> u64 {
    3000
}

fn default_transcript_capacity() -> usize {
    200
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: default_typing_delay_ms(),
            close_delay_ms: default_close_delay_ms(),
            transcript_capacity: default_transcript_capacity(),
        }
    }
}

/// Location source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    /// No location capability
    #[default]
    None,
    /// Configured coordinates
    Fixed,
    /// HTTP lookup service
    Http,
}

impl LocationSource {
    pub fn parse_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "fixed" => Ok(Self::Fixed),
            "http" => Ok(Self::Http),
            other => Err(format!("Unknown location source: {}", other)),
        }
    }
}

/// Geolocation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    #[serde(default)]
    pub provider: LocationSource,

    /// Lookup URL for the `http` source
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout for the `http` source (seconds)
    #[serde(default = "default_geolocation_timeout")]
    pub timeout_seconds: u64,

    /// Latitude for the `fixed` source
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Longitude for the `fixed` source
    #[serde(default)]
    pub longitude: Option<f64>,
}

fn default_geolocation_timeout() -> u64 {
    10
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            provider: LocationSource::default(),
            endpoint: None,
            timeout_seconds: default_geolocation_timeout(),
            latitude: None,
            longitude: None,
        }
    }
}

/// Page-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Canonical page URL used in structured metadata
    #[serde(default = "default_page_url")]
    pub page_url: String,
}

fn default_page_url() -> String {
    "https://suchisecopure.example/".to_string()
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            page_url: default_page_url(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| StorefrontError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| StorefrontError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(mode) = std::env::var("ECOPURE_DISPATCH_MODE") {
            match DispatchMode::parse_str(&mode) {
                Ok(value) => self.dispatch.mode = value,
                Err(e) => tracing::warn!("Invalid ECOPURE_DISPATCH_MODE: {}", e),
            }
        }

        if let Ok(base_url) = std::env::var("ECOPURE_DISPATCH_BASE_URL") {
            self.dispatch.base_url = base_url;
        }

        if let Ok(delay) = std::env::var("ECOPURE_TYPING_DELAY_MS") {
            if let Ok(value) = delay.parse() {
                self.chat.typing_delay_ms = value;
            } else {
                tracing::warn!("Invalid ECOPURE_TYPING_DELAY_MS: {}", delay);
            }
        }

        if let Ok(delay) = std::env::var("ECOPURE_CLOSE_DELAY_MS") {
            if let Ok(value) = delay.parse() {
                self.chat.close_delay_ms = value;
            } else {
                tracing::warn!("Invalid ECOPURE_CLOSE_DELAY_MS: {}", delay);
            }
        }

        if let Ok(capacity) = std::env::var("ECOPURE_TRANSCRIPT_CAPACITY") {
            if let Ok(value) = capacity.parse() {
                self.chat.transcript_capacity = value;
            } else {
                tracing::warn!("Invalid ECOPURE_TRANSCRIPT_CAPACITY: {}", capacity);
            }
        }

        if let Ok(source) = std::env::var("ECOPURE_GEOLOCATION_PROVIDER") {
            match LocationSource::parse_str(&source) {
                Ok(value) => self.geolocation.provider = value,
                Err(e) => tracing::warn!("Invalid ECOPURE_GEOLOCATION_PROVIDER: {}", e),
            }
        }

        if let Ok(endpoint) = std::env::var("ECOPURE_GEOLOCATION_ENDPOINT") {
            self.geolocation.endpoint = Some(endpoint);
        }

        if let Ok(page_url) = std::env::var("ECOPURE_PAGE_URL") {
            self.storefront.page_url = page_url;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        use crate::cli::Commands;

        let (dispatch, location) = match &cli.command {
            Commands::Shop { dispatch, location } => (dispatch.as_deref(), location.as_deref()),
            Commands::Chat { dispatch } => (dispatch.as_deref(), None),
            Commands::Metadata { url, .. } => {
                if let Some(url) = url {
                    self.storefront.page_url = url.clone();
                }
                (None, None)
            }
            Commands::Catalog { .. } => (None, None),
        };

        if let Some(mode) = dispatch {
            match DispatchMode::parse_str(mode) {
                Ok(value) => self.dispatch.mode = value,
                Err(e) => tracing::warn!("Ignoring --dispatch: {}", e),
            }
        }

        if let Some(source) = location {
            match LocationSource::parse_str(source) {
                Ok(value) => self.geolocation.provider = value,
                Err(e) => tracing::warn!("Ignoring --location: {}", e),
            }
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Config` describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if url::Url::parse(&self.dispatch.base_url).is_err() {
            return Err(StorefrontError::Config(format!(
                "dispatch.base_url is not a valid URL: {}",
                self.dispatch.base_url
            ))
            .into());
        }

        if url::Url::parse(&self.storefront.page_url).is_err() {
            return Err(StorefrontError::Config(format!(
                "storefront.page_url is not a valid URL: {}",
                self.storefront.page_url
            ))
            .into());
        }

        if self.chat.transcript_capacity == 0 {
            return Err(StorefrontError::Config(
                "chat.transcript_capacity must be greater than 0".to_string(),
            )
            .into());
        }

        match self.geolocation.provider {
            LocationSource::None => {}
            LocationSource::Http => {
                let endpoint = self.geolocation.endpoint.as_deref().unwrap_or("");
                if url::Url::parse(endpoint).is_err() {
                    return Err(StorefrontError::Config(
                        "geolocation.endpoint must be a valid URL when provider is http"
                            .to_string(),
                    )
                    .into());
                }
                if self.geolocation.timeout_seconds == 0 {
                    return Err(StorefrontError::Config(
                        "geolocation.timeout_seconds must be greater than 0".to_string(),
                    )
                    .into());
                }
            }
            LocationSource::Fixed => match (self.geolocation.latitude, self.geolocation.longitude) {
                (Some(lat), Some(lon)) => {
                    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                        return Err(StorefrontError::Config(format!(
                            "geolocation coordinates out of range: {}, {}",
                            lat, lon
                        ))
                        .into());
                    }
                }
                _ => {
                    return Err(StorefrontError::Config(
                        "geolocation.latitude and geolocation.longitude are required when provider is fixed"
                            .to_string(),
                    )
                    .into());
                }
            },
        }

        Ok(())
    }
}
