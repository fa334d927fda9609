//! Unified error types and result handling for the crate.
//!
//! All fallible operations return [`Result`], and every failure mode a caller
//! may want to branch on carries its data as named fields. `StockConflict` is
//! the only variant that is safe to retry blindly; the sale executor does so
//! with a bounded number of attempts.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or semantic configuration problems
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// The referenced product does not exist
    #[error("Product {id} not found")]
    ProductNotFound {
        /// Product ID that was looked up
        id: i64,
    },

    /// The requested quantity exceeds what is currently in stock
    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock {
        /// Units currently in stock
        available: i64,
        /// Units the caller asked for
        requested: i64,
    },

    /// A quantity outside the acceptable range was supplied
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i64,
    },

    /// A price outside the acceptable range was supplied
    #[error("Invalid price: {price}")]
    InvalidPrice {
        /// The rejected price
        price: i64,
    },

    /// Wholesale price exceeds retail price; never silently swapped
    #[error("Inverted prices for '{sku}': wholesale {wholesale} exceeds retail {retail}")]
    PriceInversion {
        /// SKU whose price configuration is inverted
        sku: String,
        /// Configured wholesale price
        wholesale: i64,
        /// Configured retail price
        retail: i64,
    },

    /// A guarded stock update lost a race; the expected quantity was stale
    #[error("Stock for product {id} changed concurrently (expected quantity {expected})")]
    StockConflict {
        /// Product whose stock moved underneath us
        id: i64,
        /// Quantity the update expected to find
        expected: i64,
    },

    /// A write failed; the operation name says which step
    #[error("Persistence failure during {operation}: {source}")]
    Persistence {
        /// The write that failed (e.g. "sale insert")
        operation: &'static str,
        /// Underlying database error
        #[source]
        source: sea_orm::DbErr,
    },

    /// A sale row may have been committed while its stock and audit writes
    /// were not; surfaced only when a rollback could not be confirmed
    #[error("Sale {sale_id} may be recorded without stock updates: {source}")]
    PartialFailure {
        /// ID of the sale row whose fate is unknown
        sale_id: i64,
        /// The failure that aborted the stock updates
        #[source]
        source: Box<Error>,
    },

    /// Database errors from reads and infrastructure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O errors (config files, local data directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
