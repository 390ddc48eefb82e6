mod cart;
mod products;
mod stores;

use anyhow::Context;
use clap::{Parser, Subcommand};
use richview_catalog::{CatalogClient, FrameProbe};
use richview_core::AppConfig;
use tracing_subscriber::EnvFilter;

use crate::cart::CartCommands;
use crate::products::ProductCommands;
use crate::stores::StoreCommands;

#[derive(Debug, Parser)]
#[command(name = "richview-cli")]
#[command(about = "Richview storefront command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage the durable local cart
    Cart {
        /// Currency used to display prices and totals
        #[arg(long, global = true, default_value = "NGN")]
        currency: String,
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Check whether a page can be embedded in a frame
    CheckFrame {
        /// URL to probe (may be percent-encoded)
        url: String,
    },
    /// Find physical stores
    Stores {
        #[command(subcommand)]
        command: StoreCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = richview_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Cart { currency, command }) => {
            cart::run(&config, &currency, command).await?;
        }
        Some(Commands::Products { command }) => products::run(&config, command).await?,
        Some(Commands::CheckFrame { url }) => run_check_frame(&config, &url).await?,
        Some(Commands::Stores { command }) => stores::run(&config, &command)?,
        None => println!("richview-cli ready; run with --help for commands"),
    }

    Ok(())
}

/// Builds the catalog client, failing with a pointer to the missing secret.
pub(crate) fn catalog_client(config: &AppConfig) -> anyhow::Result<CatalogClient> {
    CatalogClient::from_config(config)
        .context("catalog client unavailable; set PAYSTACK_SECRET_KEY")
}

async fn run_check_frame(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let probe = FrameProbe::new(config.catalog_timeout_secs, &config.catalog_user_agent)?;
    let check = probe.check_or_assume_blocked(url).await;
    println!("{}", serde_json::to_string_pretty(&check)?);
    Ok(())
}

#[cfg(test)]
mod tests;
