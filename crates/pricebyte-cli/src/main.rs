mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pricebyte-cli")]
#[command(about = "PriceByte command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch one product from the backend and print its normalized view
    Product {
        /// Backend product id
        id: i64,
    },
    /// Run a backend search and print the raw response body
    Search {
        query: String,
        #[arg(long, default_value_t = 0)]
        offset: i64,
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
    /// Search a supermarket through its `RapidAPI` endpoint
    StoreSearch {
        /// Store label: "Coles Store" or "Woolies Store"
        #[arg(long)]
        store: String,
        product_name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = pricebyte_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Product { id }) => commands::run_product(&config, id).await?,
        Some(Commands::Search {
            query,
            offset,
            limit,
        }) => commands::run_search(&config, &query, offset, limit).await?,
        Some(Commands::StoreSearch {
            store,
            product_name,
        }) => commands::run_store_search(&config, &store, &product_name).await?,
        None => println!("pricebyte-cli ready; see --help for commands"),
    }

    Ok(())
}
