//! Ledger service: recording lots and sales, and valuing inventory

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use shared::models::{
    DayInventory, LedgerQuery, NewPurchaseLot, NewSale, OverallInventory, PurchaseLot,
    SaleTransaction,
};
use shared::validation::{validate_quantity, validate_unit_amount};
use shared::valuation::{compute_day_details, value_inventory};

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::repositories::{LedgerRepository, PriceRepository, Repositories};
use crate::services::GradeService;

/// Inventory service for recording trades and computing valuations
#[derive(Clone)]
pub struct InventoryService {
    ledger: Arc<dyn LedgerRepository>,
    prices: Arc<dyn PriceRepository>,
    grades: GradeService,
}

/// Input for recording a purchase lot
#[derive(Debug, Clone, Deserialize)]
pub struct AddLotInput {
    pub product_id: Uuid,
    pub grade_id: Uuid,
    pub date: NaiveDate,
    pub quantity_kg: Decimal,
    pub unit_cost: Decimal,
}

/// Input for recording a sale
#[derive(Debug, Clone, Deserialize)]
pub struct AddSaleInput {
    pub product_id: Uuid,
    pub grade_id: Uuid,
    pub date: NaiveDate,
    pub quantity_kg: Decimal,
    pub unit_price: Decimal,
}

fn check_amounts(quantity_kg: Decimal, unit_amount: Decimal, amount_field: &str) -> AppResult<()> {
    validate_quantity(quantity_kg).map_err(|msg| AppError::validation("quantity_kg", msg))?;
    validate_unit_amount(unit_amount).map_err(|msg| AppError::validation(amount_field, msg))?;
    Ok(())
}

impl InventoryService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            ledger: repos.ledger.clone(),
            prices: repos.prices.clone(),
            grades: GradeService::new(repos),
        }
    }

    /// Record a purchase. The grade must exist and belong to the product.
    pub async fn add_purchase_lot(
        &self,
        actor: &AuthUser,
        input: AddLotInput,
    ) -> AppResult<PurchaseLot> {
        check_amounts(input.quantity_kg, input.unit_cost, "unit_cost")?;
        self.grades
            .get_for_product(input.product_id, input.grade_id)
            .await?;

        let lot = self
            .ledger
            .create_lot(NewPurchaseLot {
                user_id: actor.user_id,
                product_id: input.product_id,
                grade_id: input.grade_id,
                date: input.date,
                quantity_kg: input.quantity_kg,
                unit_cost: input.unit_cost,
            })
            .await?;

        tracing::info!(
            user_id = %actor.user_id,
            lot_id = %lot.id,
            quantity_kg = %lot.quantity_kg,
            "Purchase lot recorded"
        );
        Ok(lot)
    }

    /// Record a sale. Selling more than is on hand is allowed.
    pub async fn add_sale(&self, actor: &AuthUser, input: AddSaleInput) -> AppResult<SaleTransaction> {
        check_amounts(input.quantity_kg, input.unit_price, "unit_price")?;
        self.grades
            .get_for_product(input.product_id, input.grade_id)
            .await?;

        let sale = self
            .ledger
            .create_sale(NewSale {
                user_id: actor.user_id,
                product_id: input.product_id,
                grade_id: input.grade_id,
                date: input.date,
                quantity_kg: input.quantity_kg,
                unit_price: input.unit_price,
            })
            .await?;

        tracing::info!(
            user_id = %actor.user_id,
            sale_id = %sale.id,
            quantity_kg = %sale.quantity_kg,
            "Sale recorded"
        );
        Ok(sale)
    }

    pub async fn list_lots(&self, actor: &AuthUser, query: LedgerQuery) -> AppResult<Vec<PurchaseLot>> {
        self.ledger.lots(actor.user_id, &query).await
    }

    pub async fn list_sales(
        &self,
        actor: &AuthUser,
        query: LedgerQuery,
    ) -> AppResult<Vec<SaleTransaction>> {
        self.ledger.sales(actor.user_id, &query).await
    }

    /// Value the caller's inventory as of the end of `date`
    pub async fn inventory_on_date(
        &self,
        actor: &AuthUser,
        date: NaiveDate,
    ) -> AppResult<OverallInventory> {
        let (lots, sales) = self.ledger.history(actor.user_id, date).await?;
        let prices = self.prices.prices_for_date(date).await?;

        tracing::debug!(
            user_id = %actor.user_id,
            %date,
            lots = lots.len(),
            sales = sales.len(),
            prices = prices.len(),
            "Valuing inventory"
        );
        Ok(value_inventory(date, &lots, &sales, &prices))
    }

    /// Valuation as of today (UTC)
    pub async fn current_inventory(&self, actor: &AuthUser) -> AppResult<OverallInventory> {
        self.inventory_on_date(actor, Utc::now().date_naive()).await
    }

    /// Same-day buy/sell summary for `date`
    pub async fn day_details(&self, actor: &AuthUser, date: NaiveDate) -> AppResult<DayInventory> {
        let (lots, sales) = self.ledger.history(actor.user_id, date).await?;
        Ok(compute_day_details(date, &lots, &sales))
    }
}
