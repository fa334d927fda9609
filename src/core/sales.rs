//! Sale business logic - The sale transaction executor.
//!
//! [`record_sale`] turns a sale request into a committed [`sale::Model`] plus
//! a price summary, or into a typed error with nothing written. The sequence
//! is fixed: fetch a fresh product snapshot priced from the authoritative
//! list, fail fast on missing products and insufficient stock, resolve the
//! unit price, compute the total exactly once, then insert the sale, deduct
//! stock through the guarded conditional update, and append the
//! `SALE_DEDUCT` ledger row inside a single transaction.
//!
//! A lost stock race rolls the transaction back and re-runs the whole
//! sequence from the fetch, bounded at [`MAX_SALE_ATTEMPTS`]. No other error
//! is retried.

use crate::{
    core::{
        actor::Actor,
        catalog::{self, PriceBook},
        pricing::{self, WholesalePolicy},
        products,
    },
    entities::{
        Product, product,
        sale::{self, SaleType},
        stock_change::{self, StockChangeType},
    },
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, Set, TransactionTrait, prelude::*};
use tracing::{error, info, instrument, warn};

/// How many times a sale is attempted when the stock guard keeps losing races
pub const MAX_SALE_ATTEMPTS: u32 = 3;

/// Optional customer details attached to a sale.
#[derive(Debug, Clone)]
pub struct CustomerInfo {
    /// Customer name
    pub name: String,
    /// Customer phone number
    pub phone: Option<String>,
    /// Amount paid at the till; when omitted the sale is fully paid
    pub amount_paid: Option<i64>,
}

/// Everything needed to record one sale.
#[derive(Debug, Clone)]
pub struct SaleRequest {
    /// The product being sold
    pub product_id: i64,
    /// Units to sell
    pub quantity: i64,
    /// Staff member recording the sale
    pub actor: Actor,
    /// Customer details, if any were taken
    pub customer: Option<CustomerInfo>,
}

/// The price breakdown for a completed sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSummary {
    /// Price per unit that was charged
    pub unit_price: i64,
    /// Total charged: `unit_price * quantity`
    pub total_amount: i64,
    /// Whether the wholesale price applied
    pub is_wholesale: bool,
    /// Units sold
    pub quantity: i64,
    /// Name of the product sold
    pub product_name: String,
}

/// A committed sale and its price breakdown.
#[derive(Debug, Clone)]
pub struct SaleReceipt {
    /// The sale row as persisted
    pub sale: sale::Model,
    /// The price breakdown callers display
    pub price: PriceSummary,
}

/// Records a sale: persists the sale row, deducts stock, and appends the
/// audit ledger row, all inside one transaction.
///
/// On a stock conflict the whole sequence re-runs from a fresh snapshot,
/// up to [`MAX_SALE_ATTEMPTS`] times, then the conflict is surfaced.
///
/// # Errors
/// Returns an error if:
/// - The quantity is below the policy's minimum order quantity
/// - The product does not exist
/// - The requested quantity exceeds the stock on hand
/// - The product's price configuration is inverted
/// - Stock kept moving underneath the sale after all retry attempts
/// - A database write fails; `Error::PartialFailure` marks the rare case
///   where a rollback after the sale insert could not be confirmed
#[instrument(
    skip(db, book, policy, request),
    fields(product_id = request.product_id, quantity = request.quantity)
)]
pub async fn record_sale(
    db: &DatabaseConnection,
    book: &PriceBook,
    policy: &WholesalePolicy,
    request: SaleRequest,
) -> Result<SaleReceipt> {
    if request.quantity < policy.min_order_quantity() {
        return Err(Error::InvalidQuantity {
            quantity: request.quantity,
        });
    }

    let mut attempt = 1;
    loop {
        match attempt_sale(db, book, policy, &request).await {
            Err(Error::StockConflict { id, expected }) if attempt < MAX_SALE_ATTEMPTS => {
                warn!(
                    product_id = id,
                    expected, attempt, "stock moved during sale, retrying"
                );
                attempt += 1;
            }
            other => return other,
        }
    }
}

/// One full pass of the sale sequence against a fresh snapshot.
async fn attempt_sale(
    db: &DatabaseConnection,
    book: &PriceBook,
    policy: &WholesalePolicy,
    request: &SaleRequest,
) -> Result<SaleReceipt> {
    // Fresh authoritative snapshot; never a cached price
    let product = Product::find_by_id(request.product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound {
            id: request.product_id,
        })?;
    let product = catalog::apply_authoritative_prices(product, book);

    if request.quantity > product.current_qty {
        return Err(Error::InsufficientStock {
            available: product.current_qty,
            requested: request.quantity,
        });
    }

    let quote = pricing::resolve_price(&product, request.quantity, policy)?;

    // The total is computed exactly once; every later use reads this value
    let total_amount = quote.unit_price * request.quantity;

    let amount_paid = request
        .customer
        .as_ref()
        .and_then(|c| c.amount_paid)
        .unwrap_or(total_amount);
    let amount_owing = (total_amount - amount_paid).max(0);
    let payment_status = if amount_owing > 0 { "partial" } else { "paid" };

    let txn = db.begin().await?;

    let sale_model = sale::ActiveModel {
        product_id: Set(product.id),
        product_name: Set(product.name.clone()),
        quantity: Set(request.quantity),
        unit_price: Set(quote.unit_price),
        total_amount: Set(total_amount),
        sale_type: Set(if quote.is_wholesale {
            SaleType::Wholesale
        } else {
            SaleType::Retail
        }),
        customer_name: Set(request.customer.as_ref().map(|c| c.name.clone())),
        customer_phone: Set(request.customer.as_ref().and_then(|c| c.phone.clone())),
        payment_status: Set(payment_status.to_string()),
        amount_paid: Set(amount_paid),
        amount_owing: Set(amount_owing),
        sold_by: Set(request.actor.id.clone()),
        sale_date: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let sale = sale_model
        .insert(&txn)
        .await
        .map_err(|e| Error::Persistence {
            operation: "sale insert",
            source: e,
        })?;

    match deduct_stock(&txn, &product, &sale, request).await {
        Ok(()) => {
            txn.commit().await.map_err(|e| Error::Persistence {
                operation: "sale commit",
                source: e,
            })?;

            info!(
                sale_id = sale.id,
                product = %sale.product_name,
                quantity = sale.quantity,
                total = sale.total_amount,
                wholesale = quote.is_wholesale,
                "sale recorded"
            );

            let price = PriceSummary {
                unit_price: quote.unit_price,
                total_amount,
                is_wholesale: quote.is_wholesale,
                quantity: sale.quantity,
                product_name: sale.product_name.clone(),
            };
            Ok(SaleReceipt { sale, price })
        }
        Err(err) => {
            // The sale row is already in; roll it back explicitly so a failure
            // of the rollback itself can be told apart from a clean abort
            if let Err(rollback_err) = txn.rollback().await {
                error!(
                    sale_id = sale.id,
                    error = %rollback_err,
                    "rollback failed after aborted sale"
                );
                return Err(Error::PartialFailure {
                    sale_id: sale.id,
                    source: Box::new(err),
                });
            }
            Err(err)
        }
    }
}

/// Deducts the sold quantity through the guarded update and appends the
/// `SALE_DEDUCT` ledger row. Runs inside the sale's transaction.
async fn deduct_stock<C>(
    txn: &C,
    product: &product::Model,
    sale: &sale::Model,
    request: &SaleRequest,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let updated =
        products::adjust_quantity_guarded(txn, product.id, -sale.quantity, product.current_qty)
            .await?;

    let change = stock_change::ActiveModel {
        product_id: Set(product.id),
        product_name: Set(product.name.clone()),
        change_type: Set(StockChangeType::SaleDeduct),
        quantity: Set(sale.quantity),
        previous_qty: Set(product.current_qty),
        new_qty: Set(updated.current_qty),
        changed_by: Set(request.actor.id.clone()),
        reason: Set(format!(
            "Sale: {} units @ ₦{}",
            sale.quantity, sale.unit_price
        )),
        timestamp: Set(chrono::Utc::now()),
        ..Default::default()
    };
    change.insert(txn).await.map_err(|e| Error::Persistence {
        operation: "stock change insert",
        source: e,
    })?;

    Ok(())
}
