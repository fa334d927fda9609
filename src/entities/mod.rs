//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod price_correction;
pub mod product;
pub mod sale;
pub mod stock_change;

// Re-export specific types to avoid conflicts
pub use price_correction::{
    Column as PriceCorrectionColumn, Entity as PriceCorrection, Model as PriceCorrectionModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
pub use stock_change::{
    Column as StockChangeColumn, Entity as StockChange, Model as StockChangeModel,
};
