//! Product entity - Represents a beverage product carried by the depot.
//!
//! Each product has a unique SKU, a category that decides its wholesale
//! threshold, a retail and a wholesale price in whole naira, and current
//! stock information. Prices change only through explicit overrides or
//! automated reconciliation; quantities change only through guarded
//! stock additions and sale deductions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Beverage category, stored as a lowercase string.
///
/// The category decides which wholesale threshold applies when pricing an
/// order: canned drinks go wholesale at larger order sizes than bottled ones.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    /// Bottled water
    #[sea_orm(string_value = "water")]
    Water,
    /// Returnable glass bottles
    #[sea_orm(string_value = "glass")]
    Glass,
    /// PET / plastic bottles
    #[sea_orm(string_value = "plastic")]
    Plastic,
    /// Canned drinks
    #[sea_orm(string_value = "can")]
    Can,
}

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Stock keeping unit, the stable key used by the authoritative price list
    #[sea_orm(unique)]
    pub sku: String,
    /// Human-readable name (e.g., "Pepsi RGB", "Dubic Can")
    pub name: String,
    /// Beverage category, decides the wholesale threshold
    pub category: ProductCategory,
    /// Price per unit for retail-sized orders, in whole naira
    pub retail_price: i64,
    /// Price per unit once an order reaches the wholesale threshold, in whole naira
    pub wholesale_price: i64,
    /// Units currently in stock
    pub current_qty: i64,
    /// Low-stock warning threshold
    pub min_qty: i64,
    /// When the product was created
    pub created_at: DateTime,
    /// When the product was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many sales
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
    /// One product has many stock changes
    #[sea_orm(has_many = "super::stock_change::Entity")]
    StockChanges,
    /// One product has many price corrections
    #[sea_orm(has_many = "super::price_correction::Entity")]
    PriceCorrections,
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::stock_change::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockChanges.def()
    }
}

impl Related<super::price_correction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceCorrections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
