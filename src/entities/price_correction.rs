//! Price correction entity - Records automated price reconciliations.
//!
//! Whenever reconciliation finds a stored price drifted beyond tolerance
//! from the authoritative price list, the old and new values are recorded
//! here. The table is append-only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Price correction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_corrections")]
pub struct Model {
    /// Unique identifier for the correction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the product that was corrected
    pub product_id: i64,
    /// SKU of the product, the key into the authoritative price list
    pub sku: String,
    /// Product name at the time of the correction
    pub product_name: String,
    /// Retail price before the correction, in whole naira
    pub old_retail: i64,
    /// Retail price after the correction, in whole naira
    pub new_retail: i64,
    /// Wholesale price before the correction, in whole naira
    pub old_wholesale: i64,
    /// Wholesale price after the correction, in whole naira
    pub new_wholesale: i64,
    /// Why the correction was made
    pub reason: String,
    /// When the correction happened
    pub timestamp: DateTimeUtc,
}

/// Defines relationships between `PriceCorrection` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each price correction belongs to one product
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
