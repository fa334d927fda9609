//! Pricing business logic - Decides which price applies to an order.
//!
//! The resolver is a pure function over a product snapshot, an order quantity,
//! and a [`WholesalePolicy`]: same inputs, same quote, no I/O. An order
//! qualifies for the wholesale price when its quantity reaches the threshold
//! for the product's category. Thresholds are table-driven so that policy
//! changes are configuration edits, not code edits.

use crate::{
    entities::product::{self, ProductCategory},
    errors::{Error, Result},
};
use std::collections::HashMap;

/// Wholesale threshold for categories without a specific entry
pub const STANDARD_WHOLESALE_THRESHOLD: i64 = 24;
/// Wholesale threshold for bottled water
pub const WATER_WHOLESALE_THRESHOLD: i64 = 24;
/// Wholesale threshold for canned drinks
pub const CAN_WHOLESALE_THRESHOLD: i64 = 30;
/// Smallest quantity a single order may carry
pub const MIN_ORDER_QUANTITY: i64 = 1;

/// Per-category wholesale thresholds plus the minimum order quantity.
///
/// Categories without an explicit entry fall back to the default threshold.
#[derive(Debug, Clone)]
pub struct WholesalePolicy {
    thresholds: HashMap<ProductCategory, i64>,
    default_threshold: i64,
    min_order_quantity: i64,
}

impl WholesalePolicy {
    /// Creates a policy with no per-category entries; every category uses
    /// `default_threshold` until overridden via [`Self::with_threshold`].
    #[must_use]
    pub fn new(default_threshold: i64, min_order_quantity: i64) -> Self {
        Self {
            thresholds: HashMap::new(),
            default_threshold,
            min_order_quantity,
        }
    }

    /// Sets the wholesale threshold for a specific category.
    #[must_use]
    pub fn with_threshold(mut self, category: ProductCategory, threshold: i64) -> Self {
        self.thresholds.insert(category, threshold);
        self
    }

    /// Returns the wholesale threshold that applies to a category.
    #[must_use]
    pub fn threshold_for(&self, category: ProductCategory) -> i64 {
        self.thresholds
            .get(&category)
            .copied()
            .unwrap_or(self.default_threshold)
    }

    /// Smallest quantity a single order may carry.
    #[must_use]
    pub const fn min_order_quantity(&self) -> i64 {
        self.min_order_quantity
    }
}

impl Default for WholesalePolicy {
    /// The depot's standing policy: cans go wholesale at 30 units,
    /// everything else at 24.
    fn default() -> Self {
        Self::new(STANDARD_WHOLESALE_THRESHOLD, MIN_ORDER_QUANTITY)
            .with_threshold(ProductCategory::Water, WATER_WHOLESALE_THRESHOLD)
            .with_threshold(ProductCategory::Can, CAN_WHOLESALE_THRESHOLD)
    }
}

/// The price decision for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    /// Price per unit to charge, in whole naira
    pub unit_price: i64,
    /// Whether the wholesale price applied
    pub is_wholesale: bool,
}

/// Resolves the unit price for an order of `quantity` units of `product`.
///
/// The wholesale price applies when the quantity reaches the threshold for
/// the product's category; otherwise the retail price applies.
///
/// # Errors
/// Returns an error if:
/// - The quantity is below the policy's minimum order quantity
/// - The product's wholesale price exceeds its retail price; inverted
///   configuration is reported, never silently swapped
pub fn resolve_price(
    product: &product::Model,
    quantity: i64,
    policy: &WholesalePolicy,
) -> Result<PriceQuote> {
    if quantity < policy.min_order_quantity() {
        return Err(Error::InvalidQuantity { quantity });
    }

    if product.wholesale_price > product.retail_price {
        return Err(Error::PriceInversion {
            sku: product.sku.clone(),
            wholesale: product.wholesale_price,
            retail: product.retail_price,
        });
    }

    let is_wholesale = quantity >= policy.threshold_for(product.category);
    let unit_price = if is_wholesale {
        product.wholesale_price
    } else {
        product.retail_price
    };

    Ok(PriceQuote {
        unit_price,
        is_wholesale,
    })
}
