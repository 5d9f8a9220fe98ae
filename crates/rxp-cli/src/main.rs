mod db;
mod search;
mod suggest;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rxp-cli")]
#[command(about = "Prescription price lookup command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the YAML drug and ZIP catalog into Postgres
    Seed {
        /// Catalog file to load (defaults to `RXP_CATALOG_PATH`)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Find and rank prices for a drug near a ZIP code
    Search {
        #[arg(long)]
        rx_cui: String,
        #[arg(long)]
        strength: String,
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
        #[arg(long)]
        zip: String,
        /// Use the YAML catalog and skip the database entirely
        #[arg(long)]
        offline: bool,
        /// Catalog file for `--offline`
        #[arg(
            long,
            env = "RXP_CATALOG_PATH",
            default_value = "./config/catalog.yaml"
        )]
        catalog: PathBuf,
    },
    /// Show the most recent searches from the audit log
    History {
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Interactive drug-name typeahead against a running server
    Suggest {
        #[arg(long, env = "RXP_SERVER_URL", default_value = "http://127.0.0.1:3000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Seed { catalog }) => {
            let config = rxp_core::load_app_config()?;
            db::run_seed(&config, catalog).await?;
        }
        Some(Commands::Search {
            rx_cui,
            strength,
            quantity,
            zip,
            offline,
            catalog,
        }) => {
            let input = rxp_core::SearchRequestInput {
                rx_cui: Some(rx_cui),
                strength: Some(strength),
                quantity: Some(quantity),
                zip: Some(zip),
            };
            if offline {
                search::run_offline_search(&catalog, input).await?;
            } else {
                let config = rxp_core::load_app_config()?;
                search::run_search(&config, input).await?;
            }
        }
        Some(Commands::History { limit }) => {
            let config = rxp_core::load_app_config()?;
            db::run_history(&config, limit).await?;
        }
        Some(Commands::Suggest { server }) => suggest::run_suggest(&server).await?,
        None => println!("rxp-cli ready; run with --help for commands"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
