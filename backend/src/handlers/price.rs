//! HTTP handlers for daily market prices

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use shared::models::DailyPrice;

use super::parse_date_param;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::price::SetPriceInput;
use crate::services::PriceService;
use crate::AppState;

#[derive(Serialize)]
pub struct PricesForDateResponse {
    pub date: NaiveDate,
    pub prices: Vec<DailyPrice>,
}

/// Set the price of one grade on one date (admin only)
pub async fn set_price(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<SetPriceInput>,
) -> AppResult<Json<DailyPrice>> {
    let price = PriceService::new(&state.repos)
        .set_price(&current_user.0, input)
        .await?;
    Ok(Json(price))
}

pub async fn get_prices_for_date(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(date): Path<String>,
) -> AppResult<Json<PricesForDateResponse>> {
    let date = parse_date_param("date", &date)?;
    let prices = PriceService::new(&state.repos).prices_for_date(date).await?;
    Ok(Json(PricesForDateResponse { date, prices }))
}

/// 404 when no price was set for that grade on that date
pub async fn get_price(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path((date, product_id, grade_id)): Path<(String, Uuid, Uuid)>,
) -> AppResult<Json<DailyPrice>> {
    let date = parse_date_param("date", &date)?;
    let price = PriceService::new(&state.repos)
        .get_price(date, product_id, grade_id)
        .await?;
    Ok(Json(price))
}
