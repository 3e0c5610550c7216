use async_graphql::{Context, Object, Result};
use chrono::NaiveDate;
use uuid::Uuid;

use shared::models::{Dashboard, DailyPrice, DayInventory, Grade, OverallInventory, Product};

use super::{caller, gql, repos};
use crate::services::{
    DashboardService, GradeService, InventoryService, PriceService, ProductService,
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Platform dashboard for `date` (admin only)
    async fn dashboard(&self, ctx: &Context<'_>, date: NaiveDate) -> Result<Dashboard> {
        let user = caller(ctx)?;
        gql(DashboardService::new(repos(ctx)?).dashboard(user, date).await)
    }

    async fn products(&self, ctx: &Context<'_>) -> Result<Vec<Product>> {
        caller(ctx)?;
        gql(ProductService::new(repos(ctx)?).list().await)
    }

    async fn grades(&self, ctx: &Context<'_>, product_id: Option<Uuid>) -> Result<Vec<Grade>> {
        caller(ctx)?;
        gql(GradeService::new(repos(ctx)?).list(product_id).await)
    }

    /// The caller's inventory valued as of today
    async fn inventory_current(&self, ctx: &Context<'_>) -> Result<OverallInventory> {
        let user = caller(ctx)?;
        gql(InventoryService::new(repos(ctx)?).current_inventory(user).await)
    }

    async fn inventory_on_date(
        &self,
        ctx: &Context<'_>,
        date: NaiveDate,
    ) -> Result<OverallInventory> {
        let user = caller(ctx)?;
        gql(InventoryService::new(repos(ctx)?)
            .inventory_on_date(user, date)
            .await)
    }

    /// Same-day buy/sell summary
    async fn inventory_day(&self, ctx: &Context<'_>, date: NaiveDate) -> Result<DayInventory> {
        let user = caller(ctx)?;
        gql(InventoryService::new(repos(ctx)?).day_details(user, date).await)
    }

    async fn prices(&self, ctx: &Context<'_>, date: NaiveDate) -> Result<Vec<DailyPrice>> {
        caller(ctx)?;
        gql(PriceService::new(repos(ctx)?).prices_for_date(date).await)
    }

    async fn price(
        &self,
        ctx: &Context<'_>,
        date: NaiveDate,
        product_id: Uuid,
        grade_id: Uuid,
    ) -> Result<DailyPrice> {
        caller(ctx)?;
        gql(PriceService::new(repos(ctx)?)
            .get_price(date, product_id, grade_id)
            .await)
    }
}
