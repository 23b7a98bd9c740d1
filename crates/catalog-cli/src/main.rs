mod output;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use catalog_client::ClientConfig;
use catalog_client::config::{DEFAULT_METADATA_HOST, DEFAULT_STOCKS_HOST};
use catalog_core::traits::{CatalogSource, ProductStore, StockSource};
use catalog_core::{StandardTitleResolver, SyncService};
use catalog_db::{Database, DatabaseConfig};

use crate::output::JsonLinesStore;

#[derive(Parser)]
#[command(
    name = "catalog-sync",
    version,
    about = "Pull catalog products, price them and store them"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one sync: fetch every feed, drop blacklisted items, add stock, store
    Fetch {
        /// Base URL of the metadata service
        #[arg(long, env = "CATALOG_METADATA_HOST", default_value = DEFAULT_METADATA_HOST)]
        metadata_host: String,

        /// Base URL of the stock service
        #[arg(long, env = "CATALOG_STOCKS_HOST", default_value = DEFAULT_STOCKS_HOST)]
        stocks_host: String,

        /// Per-request timeout in seconds
        #[arg(long, env = "CATALOG_HTTP_TIMEOUT_SECS", default_value_t = 30)]
        timeout: u64,

        /// Save products to the database (requires DATABASE_URL) instead of printing them
        #[arg(long, default_value_t = false)]
        save: bool,
    },

    /// Show stored snapshots for a product
    History {
        /// Product id
        #[arg(short, long)]
        id: String,

        /// Number of results to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("catalog=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            metadata_host,
            stocks_host,
            timeout,
            save,
        } => {
            let config = ClientConfig::new(&metadata_host, &stocks_host)?
                .with_timeout(Duration::from_secs(timeout));
            let (catalog, stock) = config.clients().context("Failed to create HTTP clients")?;

            if save {
                let db = connect_db().await?;
                cmd_fetch(catalog, stock, db.product_repo()).await?;
            } else {
                cmd_fetch(catalog, stock, JsonLinesStore::new(std::io::stdout())).await?;
            }
        }
        Commands::History { id, limit } => {
            let db = connect_db().await?;
            cmd_history(&id, limit, &db).await?;
        }
    }

    Ok(())
}

/// Connect to PostgreSQL using DATABASE_URL and bring the schema up to date.
async fn connect_db() -> Result<Database> {
    let config = DatabaseConfig::from_env()?;
    let db = Database::connect(&config)
        .await
        .context("Failed to connect to database")?;
    db.product_repo().health_check().await?;
    db.migrate().await?;
    Ok(db)
}

async fn cmd_fetch<C, S, P>(catalog: C, stock: S, store: P) -> Result<()>
where
    C: CatalogSource,
    S: StockSource,
    P: ProductStore,
{
    tracing::info!("Starting catalog sync");

    let service = SyncService::new(catalog, stock, StandardTitleResolver, store);
    let ids = service.fetch().await.map_err(|e| {
        if let Some(status) = e.upstream_status() {
            tracing::error!(status, "Upstream service rejected a request");
        }
        anyhow::anyhow!(e)
    })?;

    tracing::info!(count = ids.len(), "Catalog sync finished");
    Ok(())
}

async fn cmd_history(product_id: &str, limit: usize, db: &Database) -> Result<()> {
    let history = db.product_repo().get_history(product_id, limit).await?;

    if history.is_empty() {
        println!("No snapshots found for product {product_id}");
        return Ok(());
    }

    println!("Snapshot history for product {product_id}:\n");

    for (i, snapshot) in history.iter().enumerate() {
        let changed = match history.get(i + 1) {
            Some(older) => snapshot.data_hash != older.data_hash,
            None => true,
        };
        let status = if changed { "CHANGED" } else { "unchanged" };
        let product = &snapshot.product;

        println!(
            "  [{}] {} {} {} / {} (price: {}, quantity: {}, hash: {}...)",
            status,
            snapshot.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            product.product_type,
            product.title,
            product.subtitle,
            product.price.map_or_else(|| "-".to_string(), |p| p.to_string()),
            product
                .quantity
                .map_or_else(|| "-".to_string(), |q| q.to_string()),
            &snapshot.data_hash[..8],
        );
    }

    println!("\nTotal: {} snapshots", history.len());

    Ok(())
}
