//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary tables
//! based on the entity definitions. The module uses `SeaORM`'s `Schema::create_table_from_entity`
//! method to automatically generate SQL statements from the entity models, ensuring that the
//! database schema matches the Rust struct definitions without requiring manual SQL.

use crate::entities::{PriceCorrection, Product, Sale, StockChange};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a local `SQLite` file if not found. The default URL carries `mode=rwc` so
/// the file is created on first run.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/bevpos.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url())
        .await
        .map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// Tables are created in dependency order, products first, since the other
/// three tables reference them. Statements carry `IF NOT EXISTS` so calling
/// this on an already-initialised database is a no-op.
///
/// # Errors
/// Returns an error if a table creation statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut product_table = schema.create_table_from_entity(Product);
    let mut sale_table = schema.create_table_from_entity(Sale);
    let mut stock_change_table = schema.create_table_from_entity(StockChange);
    let mut price_correction_table = schema.create_table_from_entity(PriceCorrection);

    db.execute(builder.build(product_table.if_not_exists()))
        .await?;
    db.execute(builder.build(sale_table.if_not_exists())).await?;
    db.execute(builder.build(stock_change_table.if_not_exists()))
        .await?;
    db.execute(builder.build(price_correction_table.if_not_exists()))
        .await?;

    Ok(())
}
