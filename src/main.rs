//! Suchi's Eco Pure storefront CLI
//!
#![doc = "Main entry point for the ecopure storefront application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ecopure::cli::{Cli, Commands};
use ecopure::commands;
use ecopure::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Shop { .. } => {
            commands::shop::run_shop(config).await?;
            Ok(())
        }
        Commands::Chat { .. } => {
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Catalog { json } => {
            tracing::debug!("Showing catalog (json: {})", json);
            commands::catalog::show_catalog(json)?;
            Ok(())
        }
        Commands::Metadata { size, .. } => {
            if let Some(s) = &size {
                tracing::debug!("Rendering metadata for size: {}", s);
            }
            commands::metadata::show_metadata(&config, size.as_deref())?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so that `catalog --json` and `metadata` output stays
/// clean on stdout.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "ecopure=debug" } else { "ecopure=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
