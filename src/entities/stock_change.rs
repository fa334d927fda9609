//! Stock change entity - The append-only inventory audit ledger.
//!
//! Every movement of stock (and every manual price override) lands here with
//! before/after quantity snapshots, the staff member responsible, and a
//! human-readable reason. Rows are inserted and read, never updated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of change a ledger row records, stored as a string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockChangeType {
    /// Stock was added to inventory
    #[sea_orm(string_value = "ADD_STOCK")]
    AddStock,
    /// Stock was deducted by a completed sale
    #[sea_orm(string_value = "SALE_DEDUCT")]
    SaleDeduct,
    /// Prices were manually overridden; quantity snapshots are unchanged
    #[sea_orm(string_value = "PRICE_OVERRIDE")]
    PriceOverride,
}

/// Stock change database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_changes")]
pub struct Model {
    /// Unique identifier for the ledger row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the product affected
    pub product_id: i64,
    /// Product name at the time of the change, denormalized for display
    pub product_name: String,
    /// What kind of change this row records
    pub change_type: StockChangeType,
    /// Magnitude of the quantity change; 0 for price overrides
    pub quantity: i64,
    /// Stock level before the change
    pub previous_qty: i64,
    /// Stock level after the change
    pub new_qty: i64,
    /// ID of the staff member responsible
    pub changed_by: String,
    /// Human-readable reason for the change
    pub reason: String,
    /// When the change happened
    pub timestamp: DateTimeUtc,
}

/// Defines relationships between `StockChange` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each stock change belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
