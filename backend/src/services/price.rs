//! Daily market price service

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use shared::models::DailyPrice;
use shared::validation::validate_unit_amount;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::repositories::{PriceRepository, Repositories};
use crate::services::GradeService;

#[derive(Clone)]
pub struct PriceService {
    prices: Arc<dyn PriceRepository>,
    grades: GradeService,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetPriceInput {
    pub date: NaiveDate,
    pub product_id: Uuid,
    pub grade_id: Uuid,
    pub price_per_kg: Decimal,
}

impl PriceService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            prices: repos.prices.clone(),
            grades: GradeService::new(repos),
        }
    }

    /// Admin only. Overwrites an existing price for the same date and grade.
    pub async fn set_price(&self, actor: &AuthUser, input: SetPriceInput) -> AppResult<DailyPrice> {
        actor.require_admin()?;
        validate_unit_amount(input.price_per_kg)
            .map_err(|msg| AppError::validation("price_per_kg", msg))?;
        self.grades
            .get_for_product(input.product_id, input.grade_id)
            .await?;

        let price = DailyPrice {
            date: input.date,
            product_id: input.product_id,
            grade_id: input.grade_id,
            price_per_kg: input.price_per_kg,
        };
        self.prices.set_price(&price).await?;

        tracing::info!(
            date = %price.date,
            grade_id = %price.grade_id,
            price = %price.price_per_kg,
            "Price set"
        );
        Ok(price)
    }

    pub async fn get_price(
        &self,
        date: NaiveDate,
        product_id: Uuid,
        grade_id: Uuid,
    ) -> AppResult<DailyPrice> {
        self.prices
            .get_price(date, product_id, grade_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Price".to_string()))
    }

    pub async fn prices_for_date(&self, date: NaiveDate) -> AppResult<Vec<DailyPrice>> {
        let mut prices = self.prices.prices_for_date(date).await?;
        prices.sort_by_key(|p| (p.product_id, p.grade_id));
        Ok(prices)
    }
}
