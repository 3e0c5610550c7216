use async_graphql::{Context, Object, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::models::{DailyPrice, Grade, Product, PurchaseLot, SaleTransaction};

use super::{caller, gql, repos};
use crate::services::grade::CreateGradeInput;
use crate::services::inventory::{AddLotInput, AddSaleInput};
use crate::services::price::SetPriceInput;
use crate::services::product::CreateProductInput;
use crate::services::{GradeService, InventoryService, PriceService, ProductService};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Admin only
    async fn create_product(
        &self,
        ctx: &Context<'_>,
        name: String,
        description: Option<String>,
    ) -> Result<Product> {
        let user = caller(ctx)?;
        gql(ProductService::new(repos(ctx)?)
            .create(user, CreateProductInput { name, description })
            .await)
    }

    /// Admin only
    async fn create_grade(
        &self,
        ctx: &Context<'_>,
        product_id: Uuid,
        name: String,
        description: Option<String>,
    ) -> Result<Grade> {
        let user = caller(ctx)?;
        let input = CreateGradeInput {
            product_id,
            name,
            description,
        };
        gql(GradeService::new(repos(ctx)?).create(user, input).await)
    }

    /// Admin only
    async fn set_price(
        &self,
        ctx: &Context<'_>,
        date: NaiveDate,
        product_id: Uuid,
        grade_id: Uuid,
        price_per_kg: Decimal,
    ) -> Result<DailyPrice> {
        let user = caller(ctx)?;
        let input = SetPriceInput {
            date,
            product_id,
            grade_id,
            price_per_kg,
        };
        gql(PriceService::new(repos(ctx)?).set_price(user, input).await)
    }

    async fn add_lot(
        &self,
        ctx: &Context<'_>,
        product_id: Uuid,
        grade_id: Uuid,
        date: NaiveDate,
        quantity_kg: Decimal,
        unit_cost: Decimal,
    ) -> Result<PurchaseLot> {
        let user = caller(ctx)?;
        let input = AddLotInput {
            product_id,
            grade_id,
            date,
            quantity_kg,
            unit_cost,
        };
        gql(InventoryService::new(repos(ctx)?)
            .add_purchase_lot(user, input)
            .await)
    }

    async fn add_sale(
        &self,
        ctx: &Context<'_>,
        product_id: Uuid,
        grade_id: Uuid,
        date: NaiveDate,
        quantity_kg: Decimal,
        unit_price: Decimal,
    ) -> Result<SaleTransaction> {
        let user = caller(ctx)?;
        let input = AddSaleInput {
            product_id,
            grade_id,
            date,
            quantity_kg,
            unit_price,
        };
        gql(InventoryService::new(repos(ctx)?).add_sale(user, input).await)
    }
}
