//! Business logic services for the Spice Ledger platform

pub mod auth;
pub mod dashboard;
pub mod grade;
pub mod inventory;
pub mod price;
pub mod product;

pub use auth::AuthService;
pub use dashboard::DashboardService;
pub use grade::GradeService;
pub use inventory::InventoryService;
pub use price::PriceService;
pub use product::ProductService;
