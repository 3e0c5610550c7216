use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::models::Grade;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::grade::CreateGradeInput;
use crate::services::GradeService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GradeFilter {
    pub product_id: Option<Uuid>,
}

/// `GET /grades?product_id=` lists one product's grades, or all of them
pub async fn list_grades(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(filter): Query<GradeFilter>,
) -> AppResult<Json<Vec<Grade>>> {
    let grades = GradeService::new(&state.repos)
        .list(filter.product_id)
        .await?;
    Ok(Json(grades))
}

/// Admin only
pub async fn create_grade(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateGradeInput>,
) -> AppResult<(StatusCode, Json<Grade>)> {
    let grade = GradeService::new(&state.repos)
        .create(&current_user.0, input)
        .await?;
    Ok((StatusCode::CREATED, Json(grade)))
}
