use axum::{extract::State, http::StatusCode, Json};

use shared::models::Product;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::product::CreateProductInput;
use crate::services::ProductService;
use crate::AppState;

pub async fn list_products(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    let products = ProductService::new(&state.repos).list().await?;
    Ok(Json(products))
}

/// Admin only
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = ProductService::new(&state.repos)
        .create(&current_user.0, input)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}
