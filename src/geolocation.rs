//! Device location lookup for address autofill
//!
//! A provider yields one position per request or fails. Every failure
//! (capability missing, permission denied, timeout, transport error) is
//! reported to the customer the same way: as an alert asking them to type
//! the address by hand.

use crate::config::{GeolocationConfig, LocationSource};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Base of the map-query link injected into the address field
pub const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Location lookup failures, as shown to the customer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    /// No location capability is configured
    #[error("Geolocation is not supported by your browser")]
    Unsupported,

    /// The lookup was attempted and did not produce a position
    #[error("Unable to retrieve your location. Please enter address manually.")]
    Unavailable(String),
}

/// Map-query URL for a position
///
/// # Examples
///
/// ```
/// use ecopure::geolocation::{map_query_url, Coordinates};
///
/// assert_eq!(
///     map_query_url(Coordinates::new(17.385, 78.4867)),
///     "https://www.google.com/maps/search/?api=1&query=17.385,78.4867"
/// );
/// ```
pub fn map_query_url(coords: Coordinates) -> String {
    format!("{}{},{}", MAPS_SEARCH_URL, coords.latitude, coords.longitude)
}

/// Address line appended after a successful lookup
pub fn address_line(coords: Coordinates) -> String {
    format!("📍 My Location: {}", map_query_url(coords))
}

/// Append the location line to `address`, separated by a newline only when
/// the address already has content
pub fn append_location(address: &str, coords: Coordinates) -> String {
    if address.is_empty() {
        address_line(coords)
    } else {
        format!("{}\n{}", address, address_line(coords))
    }
}

/// Single-shot source of the device position
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Provider for environments without location capability
#[derive(Debug, Default, Clone)]
pub struct Unsupported;

#[async_trait]
impl GeolocationProvider for Unsupported {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

/// Provider that always reports the same configured position
#[derive(Debug, Clone)]
pub struct FixedLocation {
    coords: Coordinates,
}

impl FixedLocation {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl GeolocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.coords)
    }
}

/// Provider that asks an HTTP endpoint for the caller's position
///
/// The endpoint must answer `GET` with a JSON object carrying
/// `latitude`/`longitude` (or `lat`/`lon`).
#[derive(Debug, Clone)]
pub struct HttpGeolocator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGeolocator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn fetch(&self) -> Result<Coordinates, reqwest::Error> {
        self.client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json::<Coordinates>()
            .await
    }
}

#[async_trait]
impl GeolocationProvider for HttpGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        tracing::debug!("Requesting position from {}", self.endpoint);
        self.fetch().await.map_err(|e| {
            tracing::error!("Location lookup failed: {}", e);
            GeolocationError::Unavailable(e.to_string())
        })
    }
}

/// Create the provider selected in configuration
///
/// A `fixed` source with missing coordinates falls back to [`Unsupported`];
/// [`crate::config::Config::validate`] rejects that combination up front.
pub fn create_provider(config: &GeolocationConfig) -> Arc<dyn GeolocationProvider> {
    match config.provider {
        LocationSource::None => Arc::new(Unsupported),
        LocationSource::Fixed => match (config.latitude, config.longitude) {
            (Some(lat), Some(lon)) => Arc::new(FixedLocation::new(Coordinates::new(lat, lon))),
            _ => {
                tracing::warn!("Fixed location has no coordinates, location is unavailable");
                Arc::new(Unsupported)
            }
        },
        LocationSource::Http => match &config.endpoint {
            Some(endpoint) => Arc::new(HttpGeolocator::new(
                endpoint.clone(),
                Duration::from_secs(config.timeout_seconds),
            )),
            None => {
                tracing::warn!("HTTP location source has no endpoint, location is unavailable");
                Arc::new(Unsupported)
            }
        },
    }
}
