//! Shared types and models for the Spice Ledger platform
//!
//! This crate contains the domain model, the inventory valuation engine and
//! the validation helpers used by the backend. Nothing in here performs I/O:
//! callers fetch ledger records and prices and hand them over.

pub mod models;
pub mod types;
pub mod validation;
pub mod valuation;

pub use models::*;
pub use types::*;
pub use validation::*;
