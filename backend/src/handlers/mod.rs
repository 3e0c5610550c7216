//! HTTP handlers

pub mod admin;
pub mod auth;
pub mod grade;
pub mod graphql;
pub mod health;
pub mod inventory;
pub mod price;
pub mod product;

pub use admin::{get_dashboard, get_stats};
pub use auth::{login, refresh, register};
pub use grade::{create_grade, list_grades};
pub use graphql::{graphiql, graphql_handler};
pub use health::health_check;
pub use inventory::{
    add_lot, add_sale, get_current_inventory, get_day_details, get_inventory_on_date, list_lots,
    list_sales,
};
pub use price::{get_price, get_prices_for_date, set_price};
pub use product::{create_product, list_products};

use chrono::NaiveDate;

use crate::error::{AppError, AppResult};

/// Parse a `YYYY-MM-DD` request parameter
pub(crate) fn parse_date_param(field: &str, value: &str) -> AppResult<NaiveDate> {
    shared::types::parse_date(value)
        .map_err(|_| AppError::validation(field, "Invalid date format (YYYY-MM-DD)"))
}

/// Parse a required `YYYY-MM-DD` query parameter
pub(crate) fn require_date_param(field: &str, value: Option<&str>) -> AppResult<NaiveDate> {
    match value {
        Some(value) => parse_date_param(field, value),
        None => Err(AppError::validation(field, "Date parameter is required")),
    }
}
