//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        actor::{Actor, Role},
        catalog::PriceBook,
        products::{self, NewProduct},
        sales::SaleRequest,
    },
    entities::{self, product::ProductCategory},
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Returns an actor for tests. A general manager, so every operation
/// is permitted.
#[must_use]
pub fn test_actor() -> Actor {
    Actor::new("u-100", "Test Manager", Role::GeneralManager)
}

/// Creates a test product with sensible defaults.
///
/// # Arguments
/// * `db` - Database connection
/// * `sku` - Product SKU, also used as the name
///
/// # Defaults
/// * `category`: plastic
/// * `retail_price`: 2000
/// * `wholesale_price`: 1900
/// * `initial_qty`: 100
/// * `min_qty`: 10
pub async fn create_test_product(
    db: &DatabaseConnection,
    sku: &str,
) -> Result<entities::product::Model> {
    create_custom_product(db, sku, ProductCategory::Plastic, 2000, 1900, 100).await
}

/// Creates a test product with custom category, prices, and stock.
/// Use this when a test depends on specific pricing or quantities.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    sku: &str,
    category: ProductCategory,
    retail_price: i64,
    wholesale_price: i64,
    initial_qty: i64,
) -> Result<entities::product::Model> {
    products::create_product(
        db,
        NewProduct {
            sku: sku.to_string(),
            name: sku.to_string(),
            category,
            retail_price,
            wholesale_price,
            initial_qty,
            min_qty: 10,
        },
    )
    .await
}

/// Builds a sale request with the test actor and no customer details.
#[must_use]
pub fn test_sale_request(product_id: i64, quantity: i64) -> SaleRequest {
    SaleRequest {
        product_id,
        quantity,
        actor: test_actor(),
        customer: None,
    }
}

/// Builds a price book from `(sku, retail, wholesale)` entries.
#[must_use]
pub fn price_book_from(entries: &[(&str, i64, i64)]) -> PriceBook {
    let mut book = PriceBook::new();
    for (sku, retail, wholesale) in entries {
        book.insert((*sku).to_string(), *retail, *wholesale);
    }
    book
}

/// Sets up a complete test environment with one product in stock.
/// Returns (db, product) for common test scenarios.
pub async fn setup_with_product() -> Result<(DatabaseConnection, entities::product::Model)> {
    let db = setup_test_db().await?;
    let product = create_test_product(&db, "TEST-SKU").await?;
    Ok((db, product))
}
