//! Catalog and pricing configuration loading from config.toml
//!
//! The config file carries two things: the wholesale policy knobs and the
//! authoritative price list. The product entries seed the database on first
//! run and feed price reconciliation on every start, so config.toml is the
//! single place prices are maintained.

use crate::core::catalog::{DEFAULT_PRICE_TOLERANCE, PriceBook};
use crate::core::pricing::{
    CAN_WHOLESALE_THRESHOLD, MIN_ORDER_QUANTITY, STANDARD_WHOLESALE_THRESHOLD,
    WATER_WHOLESALE_THRESHOLD, WholesalePolicy,
};
use crate::core::products::{DEFAULT_MIN_QTY, NewProduct};
use crate::entities::product::ProductCategory;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Wholesale thresholds and reconciliation settings
    #[serde(default)]
    pub pricing: PricingConfig,
    /// The authoritative product list
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

/// Pricing policy knobs. Every field falls back to the standing defaults,
/// so a config file without a `[pricing]` section is valid.
#[derive(Debug, Deserialize, Clone)]
pub struct PricingConfig {
    /// Quantity at which glass and plastic sell at wholesale
    #[serde(default = "default_standard_threshold")]
    pub standard_wholesale_threshold: i64,
    /// Quantity at which water sells at wholesale
    #[serde(default = "default_water_threshold")]
    pub water_wholesale_threshold: i64,
    /// Quantity at which cans sell at wholesale
    #[serde(default = "default_can_threshold")]
    pub can_wholesale_threshold: i64,
    /// Smallest quantity a single order may carry
    #[serde(default = "default_min_order_quantity")]
    pub min_order_quantity: i64,
    /// Price drift, in naira, tolerated before reconciliation corrects a row
    #[serde(default = "default_price_tolerance")]
    pub price_tolerance: i64,
}

/// Configuration for a single product in the authoritative list
#[derive(Debug, Deserialize, Clone)]
pub struct ProductConfig {
    /// Stock keeping unit, unique across the catalog
    pub sku: String,
    /// Human-readable name
    pub name: String,
    /// Beverage category, e.g. "water", "glass", "plastic", "can"
    pub category: ProductCategory,
    /// Authoritative retail price per unit, in whole naira
    pub retail_price: i64,
    /// Authoritative wholesale price per unit, in whole naira
    pub wholesale_price: i64,
    /// Stock on hand when the product is first seeded
    #[serde(default)]
    pub initial_qty: i64,
    /// Low-stock warning threshold
    #[serde(default = "default_min_qty")]
    pub min_qty: i64,
}

fn default_standard_threshold() -> i64 {
    STANDARD_WHOLESALE_THRESHOLD
}

fn default_water_threshold() -> i64 {
    WATER_WHOLESALE_THRESHOLD
}

fn default_can_threshold() -> i64 {
    CAN_WHOLESALE_THRESHOLD
}

fn default_min_order_quantity() -> i64 {
    MIN_ORDER_QUANTITY
}

fn default_price_tolerance() -> i64 {
    DEFAULT_PRICE_TOLERANCE
}

fn default_min_qty() -> i64 {
    DEFAULT_MIN_QTY
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            standard_wholesale_threshold: default_standard_threshold(),
            water_wholesale_threshold: default_water_threshold(),
            can_wholesale_threshold: default_can_threshold(),
            min_order_quantity: default_min_order_quantity(),
            price_tolerance: default_price_tolerance(),
        }
    }
}

impl Config {
    /// Builds the wholesale policy the pricing resolver runs with.
    #[must_use]
    pub fn wholesale_policy(&self) -> WholesalePolicy {
        WholesalePolicy::new(
            self.pricing.standard_wholesale_threshold,
            self.pricing.min_order_quantity,
        )
        .with_threshold(ProductCategory::Water, self.pricing.water_wholesale_threshold)
        .with_threshold(ProductCategory::Can, self.pricing.can_wholesale_threshold)
    }

    /// Builds the authoritative price book from the product entries.
    #[must_use]
    pub fn price_book(&self) -> PriceBook {
        let mut book = PriceBook::new();
        for product in &self.products {
            book.insert(
                product.sku.clone(),
                product.retail_price,
                product.wholesale_price,
            );
        }
        book
    }

    /// Converts the product entries into seeding parameters.
    #[must_use]
    pub fn seed_products(&self) -> Vec<NewProduct> {
        self.products.iter().map(ProductConfig::to_new_product).collect()
    }
}

impl ProductConfig {
    /// Converts one config entry into product creation parameters.
    #[must_use]
    pub fn to_new_product(&self) -> NewProduct {
        NewProduct {
            sku: self.sku.clone(),
            name: self.name.clone(),
            category: self.category,
            retail_price: self.retail_price,
            wholesale_price: self.wholesale_price,
            initial_qty: self.initial_qty,
            min_qty: self.min_qty,
        }
    }
}

/// Loads catalog configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Returns
/// * `Ok(Config)` - Successfully parsed configuration
/// * `Err(Error)` - Failed to read or parse the configuration file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads catalog configuration from the default location (./config.toml)
///
/// # Returns
/// * `Ok(Config)` - Successfully parsed configuration
/// * `Err(Error)` - Failed to read or parse the configuration file
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [pricing]
            standard_wholesale_threshold = 24
            water_wholesale_threshold = 24
            can_wholesale_threshold = 30
            min_order_quantity = 1
            price_tolerance = 10

            [[products]]
            sku = "DUBIC-CAN"
            name = "Dubic Malt Can"
            category = "can"
            retail_price = 12000
            wholesale_price = 11000
            initial_qty = 50

            [[products]]
            sku = "PEPSI-RGB"
            name = "Pepsi RGB"
            category = "glass"
            retail_price = 4500
            wholesale_price = 4400
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.pricing.can_wholesale_threshold, 30);
        assert_eq!(config.pricing.price_tolerance, 10);
        assert_eq!(config.products.len(), 2);

        assert_eq!(config.products[0].sku, "DUBIC-CAN");
        assert_eq!(config.products[0].category, ProductCategory::Can);
        assert_eq!(config.products[0].initial_qty, 50);
        assert_eq!(config.products[0].min_qty, DEFAULT_MIN_QTY);

        assert_eq!(config.products[1].category, ProductCategory::Glass);
        assert_eq!(config.products[1].initial_qty, 0);
    }

    #[test]
    fn test_pricing_section_optional() {
        let toml_str = r#"
            [[products]]
            sku = "NIRVANA-1L"
            name = "Nirvana Water 1L"
            category = "water"
            retail_price = 1400
            wholesale_price = 1300
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.pricing.standard_wholesale_threshold,
            STANDARD_WHOLESALE_THRESHOLD
        );
        assert_eq!(config.pricing.can_wholesale_threshold, CAN_WHOLESALE_THRESHOLD);
        assert_eq!(config.pricing.min_order_quantity, MIN_ORDER_QUANTITY);
        assert_eq!(config.pricing.price_tolerance, DEFAULT_PRICE_TOLERANCE);
    }

    #[test]
    fn test_empty_config_parses_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.products.is_empty());
        assert_eq!(config.pricing.water_wholesale_threshold, WATER_WHOLESALE_THRESHOLD);
    }

    #[test]
    fn test_wholesale_policy_honours_configured_thresholds() {
        let toml_str = r#"
            [pricing]
            standard_wholesale_threshold = 12
            water_wholesale_threshold = 48
            can_wholesale_threshold = 6
            min_order_quantity = 2
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        let policy = config.wholesale_policy();

        assert_eq!(policy.threshold_for(ProductCategory::Glass), 12);
        assert_eq!(policy.threshold_for(ProductCategory::Plastic), 12);
        assert_eq!(policy.threshold_for(ProductCategory::Water), 48);
        assert_eq!(policy.threshold_for(ProductCategory::Can), 6);
        assert_eq!(policy.min_order_quantity(), 2);
    }

    #[test]
    fn test_price_book_from_products() {
        let toml_str = r#"
            [[products]]
            sku = "DUBIC-CAN"
            name = "Dubic Malt Can"
            category = "can"
            retail_price = 12000
            wholesale_price = 11000
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        let book = config.price_book();

        assert_eq!(book.len(), 1);
        let price = book.get_authoritative_price("DUBIC-CAN").unwrap();
        assert_eq!(price.retail, 12000);
        assert_eq!(price.wholesale, 11000);
        assert!(book.get_authoritative_price("UNKNOWN").is_none());
    }

    #[test]
    fn test_seed_products_conversion() {
        let toml_str = r#"
            [[products]]
            sku = "SK-RGB"
            name = "Schweppes RGB"
            category = "glass"
            retail_price = 3120
            wholesale_price = 3050
            initial_qty = 40
            min_qty = 12
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        let seed = config.seed_products();

        assert_eq!(seed.len(), 1);
        assert_eq!(seed[0].sku, "SK-RGB");
        assert_eq!(seed[0].name, "Schweppes RGB");
        assert_eq!(seed[0].category, ProductCategory::Glass);
        assert_eq!(seed[0].retail_price, 3120);
        assert_eq!(seed[0].wholesale_price, 3050);
        assert_eq!(seed[0].initial_qty, 40);
        assert_eq!(seed[0].min_qty, 12);
    }

    #[test]
    fn test_invalid_category_rejected() {
        let toml_str = r#"
            [[products]]
            sku = "MYSTERY"
            name = "Mystery Drink"
            category = "keg"
            retail_price = 1000
            wholesale_price = 900
        "#;

        assert!(toml::from_str::<Config>(toml_str).is_err());
    }
}
