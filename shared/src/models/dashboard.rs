//! Admin dashboard models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct DashboardUsersSummary {
    pub total: i64,
    /// Users registered since Monday of the current week
    pub weekly_new: i64,
    /// Change of `weekly_new` against the previous week, in percent
    pub weekly_change_pct: Decimal,
    /// Change of the user total against the total at the start of the month
    pub monthly_change_pct: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct DashboardProductsSummary {
    pub total: i64,
    /// Products added this month against products added last month
    pub monthly_change_pct: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct DashboardGradesSummary {
    pub total: i64,
}

/// Day-over-day movement of one grade's market price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct DashboardPriceUpdate {
    pub date: NaiveDate,
    pub product_id: Uuid,
    pub product: String,
    pub grade_id: Uuid,
    pub grade: String,
    pub price: Decimal,
    pub previous_date: NaiveDate,
    /// Zero when no price was set on the previous day
    pub previous_price: Decimal,
    pub change_delta: Decimal,
    pub change_percent: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
pub struct Dashboard {
    pub date: NaiveDate,
    pub users: DashboardUsersSummary,
    pub products: DashboardProductsSummary,
    pub grades: DashboardGradesSummary,
    pub total_items: i64,
    pub price_updates: Vec<DashboardPriceUpdate>,
}
