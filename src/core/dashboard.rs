//! Dashboard aggregates: daily sales, inventory valuation, and low-stock
//! warnings, plus plain-text formatting for logs and terminals.
//!
//! All sums run in Rust over fetched rows. At this catalog size that is
//! simpler than pushing aggregation into SQL and it keeps the money
//! arithmetic in one language.

use crate::{
    core::catalog::{self, PriceBook},
    entities::{Sale, StockChange, product, sale, stock_change},
    errors::Result,
};
use chrono::{Duration, NaiveDate, NaiveTime};
use sea_orm::{QueryOrder, QuerySelect, prelude::*};
use std::fmt::Write as _;
use tracing::instrument;

/// How many ledger entries [`recent_activity`] callers show by default
pub const DEFAULT_ACTIVITY_LIMIT: u64 = 5;

/// A point-in-time snapshot of the business for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    /// Revenue from sales dated within the day
    pub today_sales: i64,
    /// Number of sales dated within the day
    pub today_sale_count: usize,
    /// Value of all stock on hand, at wholesale prices
    pub total_stock_value: i64,
    /// Units on hand across every product
    pub total_items: i64,
    /// Products at or below their minimum quantity, in name order
    pub low_stock: Vec<product::Model>,
    /// Number of products in the catalog
    pub total_products: usize,
}

/// Builds the dashboard snapshot for the given day.
///
/// A sale counts toward the day when its date falls in `[day, day + 1)`.
/// Stock is valued at wholesale prices with the authoritative book overlaid
/// first, the same prices a sale would charge.
///
/// # Errors
/// Returns an error if a database query fails.
#[instrument(skip(db, book))]
pub async fn gather_stats(
    db: &DatabaseConnection,
    book: &PriceBook,
    day: NaiveDate,
) -> Result<DashboardStats> {
    let day_start = day.and_time(NaiveTime::MIN).and_utc();
    let day_end = day_start + Duration::days(1);

    let todays_sales = Sale::find()
        .filter(sale::Column::SaleDate.gte(day_start))
        .filter(sale::Column::SaleDate.lt(day_end))
        .all(db)
        .await?;
    let today_sales = todays_sales.iter().map(|s| s.total_amount).sum();

    let products: Vec<product::Model> = super::products::get_all_products(db)
        .await?
        .into_iter()
        .map(|p| catalog::apply_authoritative_prices(p, book))
        .collect();
    let total_stock_value = products
        .iter()
        .map(|p| p.current_qty * p.wholesale_price)
        .sum();
    let total_items = products.iter().map(|p| p.current_qty).sum();
    let total_products = products.len();
    let low_stock: Vec<product::Model> = products
        .into_iter()
        .filter(|p| p.current_qty <= p.min_qty)
        .collect();

    Ok(DashboardStats {
        today_sales,
        today_sale_count: todays_sales.len(),
        total_stock_value,
        total_items,
        low_stock,
        total_products,
    })
}

/// Fetches the most recent stock ledger entries, newest first.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn recent_activity(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<stock_change::Model>> {
    let changes = StockChange::find()
        .order_by_desc(stock_change::Column::Timestamp)
        .limit(limit)
        .all(db)
        .await?;
    Ok(changes)
}

/// Formats an amount in naira with thousands separators, e.g. `₦1,234,567`.
#[must_use]
pub fn format_naira(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-₦{grouped}")
    } else {
        format!("₦{grouped}")
    }
}

/// Renders the snapshot as plain text for logs and terminals.
#[must_use]
pub fn format_stats_summary(stats: &DashboardStats, day: NaiveDate) -> String {
    let mut output = String::new();

    // write! to a String is infallible
    writeln!(output, "Daily snapshot for {day}").unwrap();
    writeln!(
        output,
        "  Sales: {} across {} transaction(s)",
        format_naira(stats.today_sales),
        stats.today_sale_count
    )
    .unwrap();
    writeln!(
        output,
        "  Inventory: {} unit(s) across {} product(s), {} at wholesale",
        stats.total_items,
        stats.total_products,
        format_naira(stats.total_stock_value)
    )
    .unwrap();

    if stats.low_stock.is_empty() {
        writeln!(output, "  Low stock: none").unwrap();
    } else {
        writeln!(output, "  Low stock:").unwrap();
        for product in &stats.low_stock {
            writeln!(
                output,
                "    {}: {} left (minimum {})",
                product.name, product.current_qty, product.min_qty
            )
            .unwrap();
        }
    }

    output
}

/// Renders recent ledger entries as plain text, one line per entry.
#[must_use]
pub fn format_recent_activity(changes: &[stock_change::Model]) -> String {
    if changes.is_empty() {
        return "Recent activity: none\n".to_string();
    }

    let mut output = String::new();

    // write! to a String is infallible
    writeln!(output, "Recent activity:").unwrap();
    for change in changes {
        writeln!(
            output,
            "  [{}] {}: {} → {} ({})",
            change.change_type.to_value(),
            change.product_name,
            change.previous_qty,
            change.new_qty,
            change.reason
        )
        .unwrap();
    }

    output
}
