//! Product business logic - Lookups, stock movements, and price overrides.
//!
//! Every quantity write in this module goes through a guarded conditional
//! update that carries the expected previous quantity; a lost race surfaces
//! as `Error::StockConflict` instead of silently overwriting another
//! writer's change. Stock movements and price overrides also append a row
//! to the stock change ledger inside the same transaction, so the audit
//! trail can never disagree with the inventory.

use crate::{
    core::actor::Actor,
    entities::{
        Product, product,
        product::ProductCategory,
        stock_change::{self, StockChangeType},
    },
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Default low-stock threshold for newly created products
pub const DEFAULT_MIN_QTY: i64 = 10;
/// Largest quantity a single stock addition may carry
pub const MAX_STOCK_ADDITION: i64 = 100_000;

/// Parameters for creating a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Stock keeping unit, unique across the catalog
    pub sku: String,
    /// Human-readable name
    pub name: String,
    /// Beverage category
    pub category: ProductCategory,
    /// Retail price per unit, in whole naira
    pub retail_price: i64,
    /// Wholesale price per unit, in whole naira
    pub wholesale_price: i64,
    /// Units in stock at creation
    pub initial_qty: i64,
    /// Low-stock warning threshold
    pub min_qty: i64,
}

/// Retrieves a specific product by its unique ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a specific product by its SKU, returning None if not found.
///
/// The SKU is the stable key shared with the authoritative price list, so
/// this is the lookup used by seeding and reconciliation.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_sku(
    db: &DatabaseConnection,
    sku: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Sku.eq(sku))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all products ordered alphabetically by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new product, performing input validation.
///
/// # Errors
/// Returns an error if:
/// - The SKU or name is empty or whitespace-only
/// - Either price is zero or negative
/// - The wholesale price exceeds the retail price
/// - The initial quantity or minimum quantity is negative
/// - The database insert fails (including a duplicate SKU)
pub async fn create_product(db: &DatabaseConnection, new: NewProduct) -> Result<product::Model> {
    // Validate inputs
    if new.sku.trim().is_empty() {
        return Err(Error::Config {
            message: "Product SKU cannot be empty".to_string(),
        });
    }

    if new.name.trim().is_empty() {
        return Err(Error::Config {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if new.retail_price <= 0 {
        return Err(Error::InvalidPrice {
            price: new.retail_price,
        });
    }

    if new.wholesale_price <= 0 {
        return Err(Error::InvalidPrice {
            price: new.wholesale_price,
        });
    }

    if new.wholesale_price > new.retail_price {
        return Err(Error::PriceInversion {
            sku: new.sku.trim().to_string(),
            wholesale: new.wholesale_price,
            retail: new.retail_price,
        });
    }

    if new.initial_qty < 0 {
        return Err(Error::InvalidQuantity {
            quantity: new.initial_qty,
        });
    }

    if new.min_qty < 0 {
        return Err(Error::InvalidQuantity {
            quantity: new.min_qty,
        });
    }

    let now = chrono::Utc::now().naive_utc();

    let product = product::ActiveModel {
        sku: Set(new.sku.trim().to_string()),
        name: Set(new.name.trim().to_string()),
        category: Set(new.category),
        retail_price: Set(new.retail_price),
        wholesale_price: Set(new.wholesale_price),
        current_qty: Set(new.initial_qty),
        min_qty: Set(new.min_qty),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Adjusts a product's quantity by `delta`, guarded by the expected
/// previous quantity.
///
/// The update is a single conditional statement:
/// `UPDATE products SET current_qty = current_qty + delta
///  WHERE id = ? AND current_qty = expected_qty`
///
/// If no row matches, another writer changed the quantity after the caller
/// read it; the caller gets `Error::StockConflict` and decides whether to
/// re-read and retry.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist
/// - The stored quantity no longer equals `expected_qty`
/// - The database update fails
pub async fn adjust_quantity_guarded<C>(
    db: &C,
    product_id: i64,
    delta: i64,
    expected_qty: i64,
) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    // First verify the product exists, so a missing row is not reported as a conflict
    let _product = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let update = Product::update_many()
        .col_expr(
            product::Column::CurrentQty,
            Expr::col(product::Column::CurrentQty).add(delta),
        )
        .col_expr(
            product::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().naive_utc()),
        )
        .filter(product::Column::Id.eq(product_id))
        .filter(product::Column::CurrentQty.eq(expected_qty))
        .exec(db)
        .await?;

    if update.rows_affected == 0 {
        return Err(Error::StockConflict {
            id: product_id,
            expected: expected_qty,
        });
    }

    // Return the updated product
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })
}

/// Adds stock to a product and appends an `ADD_STOCK` row to the ledger,
/// both inside one transaction.
///
/// # Errors
/// Returns an error if:
/// - The quantity is below 1 or above [`MAX_STOCK_ADDITION`]
/// - The product does not exist
/// - The stored quantity changed between the read and the guarded update
/// - A database write fails
#[instrument(skip(db, actor))]
pub async fn add_stock(
    db: &DatabaseConnection,
    product_id: i64,
    quantity: i64,
    actor: &Actor,
    reason: Option<String>,
) -> Result<product::Model> {
    if quantity < 1 || quantity > MAX_STOCK_ADDITION {
        return Err(Error::InvalidQuantity { quantity });
    }

    let txn = db.begin().await?;

    let product = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let updated = adjust_quantity_guarded(&txn, product_id, quantity, product.current_qty).await?;

    let change = stock_change::ActiveModel {
        product_id: Set(product.id),
        product_name: Set(product.name.clone()),
        change_type: Set(StockChangeType::AddStock),
        quantity: Set(quantity),
        previous_qty: Set(product.current_qty),
        new_qty: Set(updated.current_qty),
        changed_by: Set(actor.id.clone()),
        reason: Set(reason.unwrap_or_else(|| "Stock addition".to_string())),
        timestamp: Set(chrono::Utc::now()),
        ..Default::default()
    };
    change.insert(&txn).await?;

    txn.commit().await?;

    info!(
        product = %product.name,
        added = quantity,
        new_qty = updated.current_qty,
        "stock added"
    );

    Ok(updated)
}

/// Overrides a product's retail and wholesale prices and appends a
/// `PRICE_OVERRIDE` row to the ledger, both inside one transaction.
///
/// The ledger row carries unchanged quantity snapshots (quantity 0), so
/// price history and stock history share one chronological trail.
///
/// # Errors
/// Returns an error if:
/// - Either price is zero or negative
/// - The new wholesale price exceeds the new retail price
/// - The product does not exist
/// - A database write fails
#[instrument(skip(db, actor))]
pub async fn override_price(
    db: &DatabaseConnection,
    product_id: i64,
    new_retail: i64,
    new_wholesale: i64,
    actor: &Actor,
    reason: Option<String>,
) -> Result<product::Model> {
    if new_retail <= 0 {
        return Err(Error::InvalidPrice { price: new_retail });
    }

    if new_wholesale <= 0 {
        return Err(Error::InvalidPrice {
            price: new_wholesale,
        });
    }

    let txn = db.begin().await?;

    let product = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    if new_wholesale > new_retail {
        return Err(Error::PriceInversion {
            sku: product.sku,
            wholesale: new_wholesale,
            retail: new_retail,
        });
    }

    let current_qty = product.current_qty;
    let name = product.name.clone();

    let mut active: product::ActiveModel = product.clone().into();
    active.retail_price = Set(new_retail);
    active.wholesale_price = Set(new_wholesale);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = active.update(&txn).await?;

    let change = stock_change::ActiveModel {
        product_id: Set(product.id),
        product_name: Set(name.clone()),
        change_type: Set(StockChangeType::PriceOverride),
        quantity: Set(0),
        previous_qty: Set(current_qty),
        new_qty: Set(current_qty),
        changed_by: Set(actor.id.clone()),
        reason: Set(reason.unwrap_or_else(|| format!("Price override by {}", actor.name))),
        timestamp: Set(chrono::Utc::now()),
        ..Default::default()
    };
    change.insert(&txn).await?;

    txn.commit().await?;

    info!(
        product = %name,
        retail = new_retail,
        wholesale = new_wholesale,
        "prices overridden"
    );

    Ok(updated)
}
