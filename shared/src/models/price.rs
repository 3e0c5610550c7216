//! Daily market prices

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Market price per kg for one grade on one date. Setting a price for a
/// date that already has one overwrites it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct DailyPrice {
    pub date: NaiveDate,
    pub product_id: Uuid,
    pub grade_id: Uuid,
    pub price_per_kg: Decimal,
}
