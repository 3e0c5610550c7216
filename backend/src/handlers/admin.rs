use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use shared::models::Dashboard;

use super::{inventory::DateQuery, parse_date_param};
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::dashboard::AdminStats;
use crate::services::DashboardService;
use crate::AppState;

pub async fn get_stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<AdminStats>> {
    let stats = DashboardService::new(&state.repos)
        .admin_stats(&current_user.0)
        .await?;
    Ok(Json(stats))
}

/// `GET /admin/dashboard?date=YYYY-MM-DD`, defaulting to today
pub async fn get_dashboard(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Dashboard>> {
    let date = match query.date.as_deref() {
        Some(date) => parse_date_param("date", date)?,
        None => Utc::now().date_naive(),
    };
    let dashboard = DashboardService::new(&state.repos)
        .dashboard(&current_user.0, date)
        .await?;
    Ok(Json(dashboard))
}
