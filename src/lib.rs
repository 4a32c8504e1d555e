//! Suchi's Eco Pure - single-product storefront library
//!
//! This library provides the storefront engine behind the `ecopure` CLI: a
//! cart, a checkout flow and a guided chat quiz that hand orders and
//! inquiries to a messaging deep-link, plus location autofill for the
//! delivery address and the page's head metadata.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `catalog`: Product, variants, gallery images and the current selection
//! - `cart`: Line items with monotonic ids and the running total
//! - `checkout`: Checkout state machine, form guard and order message
//! - `chat`: Guided quiz state machine, bounded transcript and session
//! - `dispatch`: Deep-link encoding and the fire-and-forget dispatcher
//! - `geolocation`: Single-shot position providers and address formatting
//! - `metadata`: Head metadata descriptor and its scoped installation
//! - `storefront`: The shopping session that applies checkout effects
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use ecopure::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!     Ok(())
//! }
//! ```

pub mod cart;
pub mod catalog;
pub mod chat;
pub mod checkout;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod geolocation;
pub mod metadata;
pub mod storefront;

// Re-export commonly used types
pub use cart::{Cart, LineItem, LineItemId};
pub use chat::ChatSession;
pub use config::Config;
pub use error::{Result, StorefrontError};
pub use storefront::Storefront;

#[cfg(test)]
pub mod test_utils;
