//! Domain models for the Spice Ledger platform

mod catalog;
mod dashboard;
mod inventory;
mod ledger;
mod price;
mod user;

pub use catalog::*;
pub use dashboard::*;
pub use inventory::*;
pub use ledger::*;
pub use price::*;
pub use user::*;
