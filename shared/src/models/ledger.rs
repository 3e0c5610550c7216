//! Ledger records: purchase lots and sales
//!
//! Both record kinds are append-only. Once written they are never updated or
//! deleted; inventory state is always derived by replaying them.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded purchase of `quantity_kg` of one grade at `unit_cost` per kg
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseLot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    /// Product name, joined in when the lot is read back
    pub product: String,
    pub grade_id: Uuid,
    /// Grade name, joined in when the lot is read back
    pub grade: String,
    pub date: NaiveDate,
    pub quantity_kg: Decimal,
    pub unit_cost: Decimal,
    pub created_at: DateTime<Utc>,
    /// Insertion sequence shared with sales, breaks `created_at` ties
    pub seq: i64,
}

/// A recorded sale of `quantity_kg` of one grade at `unit_price` per kg
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub product: String,
    pub grade_id: Uuid,
    pub grade: String,
    pub date: NaiveDate,
    pub quantity_kg: Decimal,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub seq: i64,
}

/// Row to insert for a purchase lot
#[derive(Debug, Clone)]
pub struct NewPurchaseLot {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub grade_id: Uuid,
    pub date: NaiveDate,
    pub quantity_kg: Decimal,
    pub unit_cost: Decimal,
}

/// Row to insert for a sale
#[derive(Debug, Clone)]
pub struct NewSale {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub grade_id: Uuid,
    pub date: NaiveDate,
    pub quantity_kg: Decimal,
    pub unit_price: Decimal,
}

/// Supported filters when listing lots or sales
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerQuery {
    pub product_id: Option<Uuid>,
    pub grade_id: Option<Uuid>,
}

impl LedgerQuery {
    pub fn matches(&self, product_id: Uuid, grade_id: Uuid) -> bool {
        self.product_id.map_or(true, |p| p == product_id)
            && self.grade_id.map_or(true, |g| g == grade_id)
    }
}
