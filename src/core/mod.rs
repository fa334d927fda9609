//! Core business logic, independent of any user interface.
//!
//! Each submodule owns one concern:
//! - [`pricing`]: pure retail/wholesale price resolution
//! - [`sales`]: the sale transaction executor
//! - [`products`]: product CRUD and guarded stock movement
//! - [`catalog`]: the authoritative price list and reconciliation
//! - [`dashboard`]: daily aggregates and formatting
//! - [`actor`]: who is performing an operation

pub mod actor;
pub mod catalog;
pub mod dashboard;
pub mod pricing;
pub mod products;
pub mod sales;
