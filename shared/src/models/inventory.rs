//! Inventory valuation models
//!
//! These are derived views. They are recomputed from the ledger on every
//! query and never persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inventory state of one product/grade as of a date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct InventorySnapshot {
    pub product_id: Uuid,
    pub product: String,
    pub grade_id: Uuid,
    pub grade: String,
    /// Quantity on hand in kg (negative after over-selling)
    pub total_quantity: Decimal,
    /// Weighted-average cost per kg, zero when nothing is on hand
    pub average_cost: Decimal,
    pub total_cost_basis: Decimal,
    /// Market price per kg on the valuation date, zero when none was set
    pub market_price: Decimal,
    pub market_value: Decimal,
    pub unrealized_pnl: Decimal,
}

/// All grades of one product rolled up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct ProductInventory {
    pub product_id: Uuid,
    pub product: String,
    pub grades: Vec<InventorySnapshot>,
    pub total_quantity: Decimal,
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_pnl: Decimal,
    pub total_pnl_pct: Decimal,
}

/// A user's whole inventory as of a date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct OverallInventory {
    pub date: NaiveDate,
    pub snapshots: Vec<InventorySnapshot>,
    pub products: Vec<ProductInventory>,
    pub total_quantity: Decimal,
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_pnl: Decimal,
    pub total_pnl_pct: Decimal,
}

/// Same-day trading activity for one product/grade
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct DayGradeDetail {
    pub product_id: Uuid,
    pub product: String,
    pub grade_id: Uuid,
    pub grade: String,
    pub bought_qty: Decimal,
    pub bought_avg_cost: Decimal,
    pub sold_qty: Decimal,
    pub sold_avg_price: Decimal,
    /// `sold_qty * (sold_avg_price - bought_avg_cost)`, using only this
    /// day's purchases as the cost reference
    pub day_pnl: Decimal,
}

/// Same-day trading activity across all grades
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct DayInventory {
    pub date: NaiveDate,
    pub grades: Vec<DayGradeDetail>,
    pub total_bought: Decimal,
    pub total_sold: Decimal,
    pub total_day_pnl: Decimal,
}
