mod filters;
mod live;
mod output;
mod query;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shelfprice_catalog::Catalog;
use shelfprice_core::RecordId;
use shelfprice_fetcher::LiveFetcher;
use tracing_subscriber::EnvFilter;

use crate::filters::{FilterArgs, SortArg};

#[derive(Debug, Parser)]
#[command(name = "shelfprice")]
#[command(about = "Compare Coca-Cola product prices across Coles, IGA and Woolworths")]
struct Cli {
    /// Stores file to load instead of `SHELFPRICE_STORES_PATH`
    #[arg(long, global = true, value_name = "PATH")]
    stores: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List products matching the filters
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Result ordering (default: load order)
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Per-store price statistics for the matching products
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Fetch the live price for one product (e.g. coles-3)
    Fetch {
        id: RecordId,
        #[arg(long)]
        json: bool,
    },
    /// Fetch live prices for every matching product and update them
    Refresh {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = shelfprice_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let stores_path = cli.stores.unwrap_or_else(|| config.stores_path.clone());
    let stores = shelfprice_core::load_stores(&stores_path)?;
    let (mut catalog, report) = Catalog::load_all(&stores.stores);
    tracing::info!(
        stores = report.loaded.len(),
        failed = report.failures.len(),
        records = report.total_records(),
        "catalog loaded"
    );

    match cli.command {
        Commands::List {
            filters,
            sort,
            json,
        } => query::run_list(&catalog, &filters.to_filter(), sort.map(Into::into), json)?,
        Commands::Summary { filters, json } => {
            query::run_summary(&catalog, &filters.to_filter(), json)?;
        }
        Commands::Fetch { id, json } => {
            let fetcher = LiveFetcher::from_config(&config, &stores.stores);
            live::run_fetch(&mut catalog, &fetcher, id, json).await?;
        }
        Commands::Refresh { filters, json } => {
            let fetcher = LiveFetcher::from_config(&config, &stores.stores);
            live::run_refresh(&mut catalog, &fetcher, &filters.to_filter(), json).await?;
        }
    }

    Ok(())
}
