//! Catalog business logic - The authoritative price list and reconciliation.
//!
//! The [`PriceBook`] is the in-memory price list keyed by SKU that the rest
//! of the system treats as the source of truth: the sale executor overlays
//! it on every product snapshot before pricing, and [`reconcile_prices`]
//! walks the stored catalog correcting any price that drifted beyond
//! tolerance, recording each correction in the append-only
//! `price_corrections` table. Reconciliation is idempotent; running it twice
//! in a row produces no further corrections.

use crate::{
    core::products::{self, NewProduct},
    entities::{price_correction, product},
    errors::Result,
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument, warn};

/// How far a stored price may drift from the authoritative price before
/// reconciliation corrects it, in whole naira
pub const DEFAULT_PRICE_TOLERANCE: i64 = 10;

const RECONCILE_REASON: &str = "Corrected to authoritative price list";

/// The authoritative retail and wholesale price for one SKU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthoritativePrice {
    /// Retail price per unit, in whole naira
    pub retail: i64,
    /// Wholesale price per unit, in whole naira
    pub wholesale: i64,
}

/// The authoritative in-memory price list, keyed by SKU.
///
/// SKUs absent from the book are passed through untouched wherever the book
/// is consulted.
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    prices: std::collections::HashMap<String, AuthoritativePrice>,
}

impl PriceBook {
    /// Creates an empty price book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the authoritative price for a SKU.
    pub fn insert(&mut self, sku: impl Into<String>, retail: i64, wholesale: i64) {
        self.prices
            .insert(sku.into(), AuthoritativePrice { retail, wholesale });
    }

    /// Returns the authoritative price for a SKU, if the book carries one.
    #[must_use]
    pub fn get_authoritative_price(&self, sku: &str) -> Option<AuthoritativePrice> {
        self.prices.get(sku).copied()
    }

    /// Number of SKUs in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether the book is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Overlays the authoritative prices onto a product snapshot.
///
/// Pure: returns the snapshot with its prices replaced when the book knows
/// the SKU, and unchanged otherwise. The sale executor applies this to every
/// fetched product so sales are always priced from the authoritative list.
#[must_use]
pub fn apply_authoritative_prices(mut product: product::Model, book: &PriceBook) -> product::Model {
    if let Some(price) = book.get_authoritative_price(&product.sku) {
        product.retail_price = price.retail;
        product.wholesale_price = price.wholesale;
    }
    product
}

/// One applied price correction, for reporting.
#[derive(Debug, Clone)]
pub struct CorrectionEntry {
    /// SKU that was corrected
    pub sku: String,
    /// Product name at the time of the correction
    pub product_name: String,
    /// Retail price before the correction
    pub old_retail: i64,
    /// Retail price after the correction
    pub new_retail: i64,
    /// Wholesale price before the correction
    pub old_wholesale: i64,
    /// Wholesale price after the correction
    pub new_wholesale: i64,
}

/// The result of one reconciliation pass.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// Corrections that were applied
    pub corrections: Vec<CorrectionEntry>,
    /// Products whose SKU the book knew and that were compared
    pub checked: usize,
    /// Products whose correction failed and was skipped
    pub skipped: usize,
}

/// Walks the stored catalog and corrects every product whose retail or
/// wholesale price drifted beyond `tolerance` from the authoritative list.
///
/// Each correction updates both stored prices to the authoritative values
/// and appends a `price_corrections` row, inside one transaction per
/// product, so one failing product never blocks the rest: failures are
/// logged and counted as skipped while the pass continues.
///
/// # Errors
/// Returns an error only if the initial catalog read fails; per-product
/// failures are reported through `ReconcileOutcome::skipped`.
#[instrument(skip(db, book))]
pub async fn reconcile_prices(
    db: &DatabaseConnection,
    book: &PriceBook,
    tolerance: i64,
) -> Result<ReconcileOutcome> {
    let catalog = products::get_all_products(db).await?;

    let mut corrections = Vec::new();
    let mut checked = 0;
    let mut skipped = 0;

    for product in catalog {
        let Some(authoritative) = book.get_authoritative_price(&product.sku) else {
            // Unknown SKUs pass through untouched
            continue;
        };
        checked += 1;

        let retail_drift = (product.retail_price - authoritative.retail).abs();
        let wholesale_drift = (product.wholesale_price - authoritative.wholesale).abs();
        if retail_drift <= tolerance && wholesale_drift <= tolerance {
            continue;
        }

        match correct_product(db, &product, authoritative).await {
            Ok(()) => {
                debug!(
                    sku = %product.sku,
                    old_retail = product.retail_price,
                    new_retail = authoritative.retail,
                    old_wholesale = product.wholesale_price,
                    new_wholesale = authoritative.wholesale,
                    "price corrected"
                );
                corrections.push(CorrectionEntry {
                    sku: product.sku,
                    product_name: product.name,
                    old_retail: product.retail_price,
                    new_retail: authoritative.retail,
                    old_wholesale: product.wholesale_price,
                    new_wholesale: authoritative.wholesale,
                });
            }
            Err(e) => {
                warn!(sku = %product.sku, error = %e, "skipping price correction");
                skipped += 1;
            }
        }
    }

    info!(
        checked,
        corrected = corrections.len(),
        skipped,
        "price reconciliation finished"
    );

    Ok(ReconcileOutcome {
        corrections,
        checked,
        skipped,
    })
}

/// Sets one product's prices to the authoritative values and records the
/// correction, atomically.
async fn correct_product(
    db: &DatabaseConnection,
    product: &product::Model,
    authoritative: AuthoritativePrice,
) -> Result<()> {
    let txn = db.begin().await?;

    let mut active: product::ActiveModel = product.clone().into();
    active.retail_price = Set(authoritative.retail);
    active.wholesale_price = Set(authoritative.wholesale);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(&txn).await?;

    let record = price_correction::ActiveModel {
        product_id: Set(product.id),
        sku: Set(product.sku.clone()),
        product_name: Set(product.name.clone()),
        old_retail: Set(product.retail_price),
        new_retail: Set(authoritative.retail),
        old_wholesale: Set(product.wholesale_price),
        new_wholesale: Set(authoritative.wholesale),
        reason: Set(RECONCILE_REASON.to_string()),
        timestamp: Set(chrono::Utc::now()),
        ..Default::default()
    };
    record.insert(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Inserts every product from the seed list that is not yet in the catalog,
/// matched by SKU. Existing rows are left untouched; price drift on them is
/// reconciliation's job, not seeding's.
///
/// Returns the number of products inserted.
///
/// # Errors
/// Returns an error if a lookup or insert fails.
pub async fn seed_catalog(db: &DatabaseConnection, seed: &[NewProduct]) -> Result<usize> {
    let mut inserted = 0;

    for new in seed {
        if products::get_product_by_sku(db, &new.sku).await?.is_some() {
            continue;
        }
        products::create_product(db, new.clone()).await?;
        debug!(sku = %new.sku, "seeded product");
        inserted += 1;
    }

    if inserted > 0 {
        info!(inserted, "catalog seeded");
    }
    Ok(inserted)
}

/// Formats a reconciliation outcome into a human-readable summary string,
/// suitable for logging after a startup pass.
#[must_use]
pub fn format_reconcile_summary(outcome: &ReconcileOutcome) -> String {
    use std::fmt::Write;

    let mut summary = format!(
        "Price reconciliation - compared {} products\n",
        outcome.checked
    );

    // write! is infallible when writing to String, so unwrap is safe
    writeln!(
        summary,
        "  Corrected: {} | Skipped: {}",
        outcome.corrections.len(),
        outcome.skipped
    )
    .unwrap();
    writeln!(summary).unwrap();

    for entry in &outcome.corrections {
        writeln!(
            summary,
            "  {} - {} | retail ₦{} → ₦{} | wholesale ₦{} → ₦{}",
            entry.sku,
            entry.product_name,
            entry.old_retail,
            entry.new_retail,
            entry.old_wholesale,
            entry.new_wholesale
        )
        .unwrap();
    }

    summary
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{PriceCorrection, product::ProductCategory};
    use crate::test_utils::*;
    use sea_orm::ConnectionTrait;

    #[test]
    fn test_price_book_lookup() {
        let mut book = PriceBook::new();
        book.insert("DUBIC-CAN", 12000, 11000);

        let price = book.get_authoritative_price("DUBIC-CAN").unwrap();
        assert_eq!(price.retail, 12000);
        assert_eq!(price.wholesale, 11000);

        assert!(book.get_authoritative_price("NO-SUCH-SKU").is_none());
        assert_eq!(book.len(), 1);
        assert!(!book.is_empty());
    }

    fn sample_product(sku: &str, retail: i64, wholesale: i64) -> product::Model {
        let now = chrono::Utc::now().naive_utc();
        product::Model {
            id: 1,
            sku: sku.to_string(),
            name: sku.to_string(),
            category: ProductCategory::Plastic,
            retail_price: retail,
            wholesale_price: wholesale,
            current_qty: 100,
            min_qty: 10,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_apply_authoritative_prices_known_sku() {
        let book = price_book_from(&[("RAZZLE-40CL", 2200, 2100)]);
        let overlaid = apply_authoritative_prices(sample_product("RAZZLE-40CL", 9999, 9000), &book);

        assert_eq!(overlaid.retail_price, 2200);
        assert_eq!(overlaid.wholesale_price, 2100);
    }

    #[test]
    fn test_apply_authoritative_prices_unknown_sku() {
        let book = price_book_from(&[("OTHER-SKU", 9999, 9000)]);
        let overlaid = apply_authoritative_prices(sample_product("LOCAL-ONLY", 2200, 2100), &book);

        assert_eq!(overlaid.retail_price, 2200);
        assert_eq!(overlaid.wholesale_price, 2100);
    }

    #[tokio::test]
    async fn test_reconcile_corrects_beyond_tolerance() -> Result<()> {
        let db = setup_test_db().await?;
        let stored =
            create_custom_product(&db, "PEPSI-RGB", ProductCategory::Glass, 4800, 4700, 50).await?;

        let book = price_book_from(&[("PEPSI-RGB", 4500, 4400)]);
        let outcome = reconcile_prices(&db, &book, DEFAULT_PRICE_TOLERANCE).await?;

        assert_eq!(outcome.checked, 1);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.corrections.len(), 1);
        let entry = &outcome.corrections[0];
        assert_eq!(entry.old_retail, 4800);
        assert_eq!(entry.new_retail, 4500);
        assert_eq!(entry.old_wholesale, 4700);
        assert_eq!(entry.new_wholesale, 4400);

        // The stored product now matches the authoritative list
        let corrected = products::get_product_by_id(&db, stored.id).await?.unwrap();
        assert_eq!(corrected.retail_price, 4500);
        assert_eq!(corrected.wholesale_price, 4400);

        // The correction is recorded in the append-only table
        let records = PriceCorrection::find().all(&db).await?;
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.sku, "PEPSI-RGB");
        assert_eq!(record.old_retail, 4800);
        assert_eq!(record.new_retail, 4500);
        assert_eq!(record.old_wholesale, 4700);
        assert_eq!(record.new_wholesale, 4400);
        assert_eq!(record.reason, "Corrected to authoritative price list");

        Ok(())
    }

    #[tokio::test]
    async fn test_reconcile_tolerance_boundary() -> Result<()> {
        let db = setup_test_db().await?;
        // Drift of exactly the tolerance is left alone
        create_custom_product(&db, "WITHIN", ProductCategory::Plastic, 2210, 2110, 10).await?;
        // Drift of tolerance + 1 is corrected
        create_custom_product(&db, "BEYOND", ProductCategory::Plastic, 2211, 2100, 10).await?;

        let book = price_book_from(&[("WITHIN", 2200, 2100), ("BEYOND", 2200, 2100)]);
        let outcome = reconcile_prices(&db, &book, DEFAULT_PRICE_TOLERANCE).await?;

        assert_eq!(outcome.checked, 2);
        assert_eq!(outcome.corrections.len(), 1);
        assert_eq!(outcome.corrections[0].sku, "BEYOND");

        let within = products::get_product_by_sku(&db, "WITHIN").await?.unwrap();
        assert_eq!(within.retail_price, 2210);

        Ok(())
    }

    #[tokio::test]
    async fn test_reconcile_corrects_downward_drift() -> Result<()> {
        let db = setup_test_db().await?;
        // Stored well below the authoritative price
        create_custom_product(&db, "SK-RGB", ProductCategory::Glass, 3000, 2900, 10).await?;

        let book = price_book_from(&[("SK-RGB", 3120, 3050)]);
        let outcome = reconcile_prices(&db, &book, DEFAULT_PRICE_TOLERANCE).await?;

        assert_eq!(outcome.corrections.len(), 1);
        let corrected = products::get_product_by_sku(&db, "SK-RGB").await?.unwrap();
        assert_eq!(corrected.retail_price, 3120);
        assert_eq!(corrected.wholesale_price, 3050);

        Ok(())
    }

    #[tokio::test]
    async fn test_reconcile_single_drifting_price_sets_both() -> Result<()> {
        let db = setup_test_db().await?;
        // Only the wholesale price drifted; the correction pins both to the list
        create_custom_product(&db, "COKE-RGB-50CL", ProductCategory::Glass, 6000, 5900, 10).await?;

        let book = price_book_from(&[("COKE-RGB-50CL", 6000, 6000)]);
        let outcome = reconcile_prices(&db, &book, DEFAULT_PRICE_TOLERANCE).await?;

        assert_eq!(outcome.corrections.len(), 1);
        let corrected = products::get_product_by_sku(&db, "COKE-RGB-50CL")
            .await?
            .unwrap();
        assert_eq!(corrected.retail_price, 6000);
        assert_eq!(corrected.wholesale_price, 6000);

        Ok(())
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        create_custom_product(&db, "RAZZLE-60CL", ProductCategory::Plastic, 3500, 3400, 10).await?;

        let book = price_book_from(&[("RAZZLE-60CL", 3200, 3100)]);

        let first = reconcile_prices(&db, &book, DEFAULT_PRICE_TOLERANCE).await?;
        assert_eq!(first.corrections.len(), 1);

        // An immediate second pass finds nothing to correct and writes nothing
        let second = reconcile_prices(&db, &book, DEFAULT_PRICE_TOLERANCE).await?;
        assert_eq!(second.checked, 1);
        assert!(second.corrections.is_empty());

        let records = PriceCorrection::find().all(&db).await?;
        assert_eq!(records.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_reconcile_ignores_unknown_skus() -> Result<()> {
        let db = setup_test_db().await?;
        let stored = create_test_product(&db, "LOCAL-ONLY").await?;

        let book = price_book_from(&[("SOMETHING-ELSE", 1000, 900)]);
        let outcome = reconcile_prices(&db, &book, DEFAULT_PRICE_TOLERANCE).await?;

        assert_eq!(outcome.checked, 0);
        assert!(outcome.corrections.is_empty());

        let unchanged = products::get_product_by_id(&db, stored.id).await?.unwrap();
        assert_eq!(unchanged.retail_price, stored.retail_price);

        Ok(())
    }

    #[tokio::test]
    async fn test_reconcile_continues_past_failed_corrections() -> Result<()> {
        let db = setup_test_db().await?;
        create_custom_product(&db, "PEPSI-RGB", ProductCategory::Glass, 4800, 4700, 10).await?;
        create_custom_product(&db, "SK-RGB", ProductCategory::Glass, 3000, 2900, 10).await?;

        // With the corrections table gone every per-product transaction
        // fails; the pass must still finish and count the failures
        db.execute_unprepared("DROP TABLE price_corrections").await?;

        let book = price_book_from(&[("PEPSI-RGB", 4500, 4400), ("SK-RGB", 3120, 3050)]);
        let outcome = reconcile_prices(&db, &book, DEFAULT_PRICE_TOLERANCE).await?;

        assert_eq!(outcome.checked, 2);
        assert_eq!(outcome.skipped, 2);
        assert!(outcome.corrections.is_empty());

        // Each failed transaction rolled back; stored prices are untouched
        let pepsi = products::get_product_by_sku(&db, "PEPSI-RGB").await?.unwrap();
        assert_eq!(pepsi.retail_price, 4800);
        assert_eq!(pepsi.wholesale_price, 4700);
        let sk = products::get_product_by_sku(&db, "SK-RGB").await?.unwrap();
        assert_eq!(sk.retail_price, 3000);
        assert_eq!(sk.wholesale_price, 2900);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_catalog_inserts_missing_only() -> Result<()> {
        let db = setup_test_db().await?;

        let seed = vec![
            NewProduct {
                sku: "DUBIC-CAN".to_string(),
                name: "Dubic Can".to_string(),
                category: ProductCategory::Can,
                retail_price: 12000,
                wholesale_price: 11000,
                initial_qty: 0,
                min_qty: products::DEFAULT_MIN_QTY,
            },
            NewProduct {
                sku: "PEPSI-RGB".to_string(),
                name: "Pepsi RGB".to_string(),
                category: ProductCategory::Glass,
                retail_price: 4500,
                wholesale_price: 4400,
                initial_qty: 0,
                min_qty: products::DEFAULT_MIN_QTY,
            },
        ];

        let inserted = seed_catalog(&db, &seed).await?;
        assert_eq!(inserted, 2);

        // Seeding again inserts nothing and disturbs nothing
        let again = seed_catalog(&db, &seed).await?;
        assert_eq!(again, 0);

        let all = products::get_all_products(&db).await?;
        assert_eq!(all.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_catalog_leaves_existing_rows_untouched() -> Result<()> {
        let db = setup_test_db().await?;

        // Product already exists with drifted prices and live stock
        create_custom_product(&db, "PEPSI-RGB", ProductCategory::Glass, 4800, 4700, 37).await?;

        let seed = vec![NewProduct {
            sku: "PEPSI-RGB".to_string(),
            name: "Pepsi RGB".to_string(),
            category: ProductCategory::Glass,
            retail_price: 4500,
            wholesale_price: 4400,
            initial_qty: 0,
            min_qty: products::DEFAULT_MIN_QTY,
        }];

        let inserted = seed_catalog(&db, &seed).await?;
        assert_eq!(inserted, 0);

        let existing = products::get_product_by_sku(&db, "PEPSI-RGB").await?.unwrap();
        assert_eq!(existing.retail_price, 4800);
        assert_eq!(existing.current_qty, 37);

        Ok(())
    }

    #[test]
    fn test_format_reconcile_summary() {
        let outcome = ReconcileOutcome {
            corrections: vec![CorrectionEntry {
                sku: "PEPSI-RGB".to_string(),
                product_name: "Pepsi RGB".to_string(),
                old_retail: 4800,
                new_retail: 4500,
                old_wholesale: 4700,
                new_wholesale: 4400,
            }],
            checked: 5,
            skipped: 1,
        };

        let summary = format_reconcile_summary(&outcome);
        assert!(summary.contains("compared 5 products"));
        assert!(summary.contains("Corrected: 1 | Skipped: 1"));
        assert!(summary.contains("PEPSI-RGB"));
        assert!(summary.contains("retail ₦4800 → ₦4500"));
        assert!(summary.contains("wholesale ₦4700 → ₦4400"));
    }
}
