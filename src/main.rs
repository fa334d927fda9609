use bevpos::{
    config::{catalog as catalog_config, database},
    core::{catalog, dashboard},
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the catalog configuration
    let config = catalog_config::load_default_config()
        .inspect_err(|e| error!("Failed to load config.toml: {e}"))?;
    info!(
        products = config.products.len(),
        "Catalog configuration loaded."
    );

    // 4. Initialize the database
    std::fs::create_dir_all("data")?;
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;

    // 5. Seed any products missing from the database
    let seeded = catalog::seed_catalog(&db, &config.seed_products())
        .await
        .inspect_err(|e| error!("Failed to seed catalog: {e}"))?;
    info!(seeded, "Catalog seeding complete.");

    // 6. Reconcile stored prices against the authoritative list
    let book = config.price_book();
    let outcome = catalog::reconcile_prices(&db, &book, config.pricing.price_tolerance)
        .await
        .inspect_err(|e| error!("Price reconciliation failed: {e}"))?;
    info!("{}", catalog::format_reconcile_summary(&outcome));

    // 7. Log today's snapshot and the latest ledger entries
    let today = chrono::Utc::now().date_naive();
    let stats = dashboard::gather_stats(&db, &book, today).await?;
    info!("{}", dashboard::format_stats_summary(&stats, today));

    let recent = dashboard::recent_activity(&db, dashboard::DEFAULT_ACTIVITY_LIMIT).await?;
    info!("{}", dashboard::format_recent_activity(&recent));

    Ok(())
}
