//! Error types for the storefront
//!
//! This module defines the crate-wide error enum, using `thiserror` for
//! ergonomic error handling. Flow-specific errors (checkout, chat,
//! geolocation) live next to the flows that raise them and convert into
//! [`StorefrontError`] where they cross module boundaries.

use thiserror::Error;

/// Main error type for storefront operations
///
/// Every variant is recoverable: the front-end reports it and the user
/// retries through the manual path.
#[derive(Error, Debug)]
pub enum StorefrontError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A size label that is not part of the catalog
    #[error("Unknown variant: {0}")]
    UnknownVariant(String),

    /// Gallery index outside the configured images
    #[error("Image index {index} is out of range (gallery has {len} images)")]
    ImageOutOfRange {
        /// Requested index
        index: usize,
        /// Number of gallery images
        len: usize,
    },

    /// Checkout flow rejected an input
    #[error(transparent)]
    Checkout(#[from] crate::checkout::CheckoutError),

    /// Guided chat rejected an input
    #[error(transparent)]
    Chat(#[from] crate::chat::ChatError),

    /// Location lookup failed
    #[error(transparent)]
    Geolocation(#[from] crate::geolocation::GeolocationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for storefront operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
