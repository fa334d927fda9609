//! Sale entity - Represents completed sale transactions.
//!
//! Sales are immutable once created: the unit price and the total are
//! captured at the moment of sale and are never rewritten by later price
//! changes. `total_amount` always equals `quantity * unit_price`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether the retail or the wholesale price applied, stored as a string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "UPPERCASE")]
pub enum SaleType {
    /// Order below the wholesale threshold
    #[sea_orm(string_value = "RETAIL")]
    Retail,
    /// Order at or above the wholesale threshold
    #[sea_orm(string_value = "WHOLESALE")]
    Wholesale,
}

/// Sale database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Unique identifier for the sale
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the product that was sold
    pub product_id: i64,
    /// Product name at the time of sale, denormalized for receipts
    pub product_name: String,
    /// Units sold
    pub quantity: i64,
    /// Price per unit actually charged, in whole naira
    pub unit_price: i64,
    /// Total charged: always `quantity * unit_price`
    pub total_amount: i64,
    /// Whether the retail or the wholesale price applied
    pub sale_type: SaleType,
    /// Customer name, if one was given
    pub customer_name: Option<String>,
    /// Customer phone number, if one was given
    pub customer_phone: Option<String>,
    /// Payment status: `"paid"` or `"partial"`
    pub payment_status: String,
    /// Amount the customer paid at the till, in whole naira
    pub amount_paid: i64,
    /// Amount still owed, in whole naira
    pub amount_owing: i64,
    /// ID of the staff member who recorded the sale
    pub sold_by: String,
    /// When the sale was recorded
    pub sale_date: DateTimeUtc,
}

/// Defines relationships between Sale and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each sale belongs to one product
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
