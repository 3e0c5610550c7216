//! HTTP handlers for the trading ledger and inventory valuation

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use shared::models::{DayInventory, LedgerQuery, OverallInventory, PurchaseLot, SaleTransaction};

use super::require_date_param;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inventory::{AddLotInput, AddSaleInput};
use crate::services::InventoryService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// Record a purchase lot
pub async fn add_lot(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AddLotInput>,
) -> AppResult<(StatusCode, Json<PurchaseLot>)> {
    let lot = InventoryService::new(&state.repos)
        .add_purchase_lot(&current_user.0, input)
        .await?;
    Ok((StatusCode::CREATED, Json(lot)))
}

/// Record a sale
pub async fn add_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AddSaleInput>,
) -> AppResult<(StatusCode, Json<SaleTransaction>)> {
    let sale = InventoryService::new(&state.repos)
        .add_sale(&current_user.0, input)
        .await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// List the caller's lots, optionally filtered by product or grade
pub async fn list_lots(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<LedgerQuery>,
) -> AppResult<Json<Vec<PurchaseLot>>> {
    let lots = InventoryService::new(&state.repos)
        .list_lots(&current_user.0, query)
        .await?;
    Ok(Json(lots))
}

/// List the caller's sales, optionally filtered by product or grade
pub async fn list_sales(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<LedgerQuery>,
) -> AppResult<Json<Vec<SaleTransaction>>> {
    let sales = InventoryService::new(&state.repos)
        .list_sales(&current_user.0, query)
        .await?;
    Ok(Json(sales))
}

pub async fn get_current_inventory(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<OverallInventory>> {
    let inventory = InventoryService::new(&state.repos)
        .current_inventory(&current_user.0)
        .await?;
    Ok(Json(inventory))
}

/// `GET /inventory/on-date?date=YYYY-MM-DD`
pub async fn get_inventory_on_date(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<OverallInventory>> {
    let date = require_date_param("date", query.date.as_deref())?;
    let inventory = InventoryService::new(&state.repos)
        .inventory_on_date(&current_user.0, date)
        .await?;
    Ok(Json(inventory))
}

/// `GET /inventory/day?date=YYYY-MM-DD`
pub async fn get_day_details(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<DayInventory>> {
    let date = require_date_param("date", query.date.as_deref())?;
    let day = InventoryService::new(&state.repos)
        .day_details(&current_user.0, date)
        .await?;
    Ok(Json(day))
}
