//! Command-line interface definition for the storefront
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the interactive shop and chat sessions plus read-only
//! catalog and metadata output.

use clap::{Parser, Subcommand};

/// Suchi's Eco Pure storefront
///
/// Browse the hair oil, fill a cart, check out, or take the guided quiz.
/// Orders and inquiries are handed off as messaging deep links.
#[derive(Parser, Debug, Clone)]
#[command(name = "ecopure")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive shopping session (gallery, cart, checkout)
    Shop {
        /// Override how order links are opened (browser, print, record)
        #[arg(short, long)]
        dispatch: Option<String>,

        /// Override the location source (none, fixed, http)
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Start the guided chat quiz
    Chat {
        /// Override how inquiry links are opened (browser, print, record)
        #[arg(short, long)]
        dispatch: Option<String>,
    },

    /// Show the product, its variants and the FAQ
    Catalog {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the head metadata for the page
    Metadata {
        /// Variant whose price the product offer carries
        #[arg(short, long)]
        size: Option<String>,

        /// Override the canonical page URL
        #[arg(short, long)]
        url: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Catalog { json: false },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Catalog { json: false }));
    }

    #[test]
    fn test_cli_parse_shop_command() {
        let cli = Cli::try_parse_from(["ecopure", "shop"]).unwrap();
        if let Commands::Shop { dispatch, location } = cli.command {
            assert!(dispatch.is_none());
            assert!(location.is_none());
        } else {
            panic!("Expected Shop command");
        }
    }

    #[test]
    fn test_cli_parse_shop_with_overrides() {
        let cli = Cli::try_parse_from([
            "ecopure",
            "shop",
            "--dispatch",
            "print",
            "--location",
            "fixed",
        ])
        .unwrap();
        if let Commands::Shop { dispatch, location } = cli.command {
            assert_eq!(dispatch, Some("print".to_string()));
            assert_eq!(location, Some("fixed".to_string()));
        } else {
            panic!("Expected Shop command");
        }
    }

    #[test]
    fn test_cli_parse_chat_with_short_dispatch() {
        let cli = Cli::try_parse_from(["ecopure", "chat", "-d", "record"]).unwrap();
        if let Commands::Chat { dispatch } = cli.command {
            assert_eq!(dispatch, Some("record".to_string()));
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_catalog_json() {
        let cli = Cli::try_parse_from(["ecopure", "catalog", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Catalog { json: true }));
    }

    #[test]
    fn test_cli_parse_metadata_with_size() {
        let cli =
            Cli::try_parse_from(["ecopure", "metadata", "--size", "500 ml", "-u", "https://x.in/"])
                .unwrap();
        if let Commands::Metadata { size, url } = cli.command {
            assert_eq!(size, Some("500 ml".to_string()));
            assert_eq!(url, Some("https://x.in/".to_string()));
        } else {
            panic!("Expected Metadata command");
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli =
            Cli::try_parse_from(["ecopure", "-v", "--config", "custom.yaml", "catalog"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
    }

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["ecopure"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["ecopure", "run"]).is_err());
    }
}
