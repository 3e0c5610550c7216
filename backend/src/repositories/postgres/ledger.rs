use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::{LedgerQuery, NewPurchaseLot, NewSale, PurchaseLot, SaleTransaction};

use crate::error::AppResult;
use crate::repositories::LedgerRepository;

/// Ledger rows come back with product and grade names joined in
const LOT_SELECT: &str = r#"
    SELECT l.id, l.user_id, l.product_id, p.name AS product, l.grade_id, g.name AS grade,
           l.date, l.quantity_kg, l.unit_cost, l.created_at, l.seq
    FROM purchase_lots l
    JOIN products p ON p.id = l.product_id
    JOIN grades g ON g.id = l.grade_id
"#;

const SALE_SELECT: &str = r#"
    SELECT s.id, s.user_id, s.product_id, p.name AS product, s.grade_id, g.name AS grade,
           s.date, s.quantity_kg, s.unit_price, s.created_at, s.seq
    FROM sales s
    JOIN products p ON p.id = s.product_id
    JOIN grades g ON g.id = s.grade_id
"#;

#[derive(Clone)]
pub struct PgLedgerRepository {
    db: PgPool,
}

impl PgLedgerRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    async fn create_lot(&self, lot: NewPurchaseLot) -> AppResult<PurchaseLot> {
        let lot = sqlx::query_as::<_, PurchaseLot>(
            r#"
            WITH l AS (
                INSERT INTO purchase_lots (user_id, product_id, grade_id, date, quantity_kg, unit_cost)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT l.id, l.user_id, l.product_id, p.name AS product, l.grade_id, g.name AS grade,
                   l.date, l.quantity_kg, l.unit_cost, l.created_at, l.seq
            FROM l
            JOIN products p ON p.id = l.product_id
            JOIN grades g ON g.id = l.grade_id
            "#,
        )
        .bind(lot.user_id)
        .bind(lot.product_id)
        .bind(lot.grade_id)
        .bind(lot.date)
        .bind(lot.quantity_kg)
        .bind(lot.unit_cost)
        .fetch_one(&self.db)
        .await?;

        Ok(lot)
    }

    async fn create_sale(&self, sale: NewSale) -> AppResult<SaleTransaction> {
        let sale = sqlx::query_as::<_, SaleTransaction>(
            r#"
            WITH s AS (
                INSERT INTO sales (user_id, product_id, grade_id, date, quantity_kg, unit_price)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT s.id, s.user_id, s.product_id, p.name AS product, s.grade_id, g.name AS grade,
                   s.date, s.quantity_kg, s.unit_price, s.created_at, s.seq
            FROM s
            JOIN products p ON p.id = s.product_id
            JOIN grades g ON g.id = s.grade_id
            "#,
        )
        .bind(sale.user_id)
        .bind(sale.product_id)
        .bind(sale.grade_id)
        .bind(sale.date)
        .bind(sale.quantity_kg)
        .bind(sale.unit_price)
        .fetch_one(&self.db)
        .await?;

        Ok(sale)
    }

    async fn lots(&self, user_id: Uuid, query: &LedgerQuery) -> AppResult<Vec<PurchaseLot>> {
        let lots = sqlx::query_as::<_, PurchaseLot>(&format!(
            r#"{LOT_SELECT}
            WHERE l.user_id = $1
              AND ($2::uuid IS NULL OR l.product_id = $2)
              AND ($3::uuid IS NULL OR l.grade_id = $3)
            ORDER BY l.date, l.created_at, l.seq
            "#
        ))
        .bind(user_id)
        .bind(query.product_id)
        .bind(query.grade_id)
        .fetch_all(&self.db)
        .await?;

        Ok(lots)
    }

    async fn sales(&self, user_id: Uuid, query: &LedgerQuery) -> AppResult<Vec<SaleTransaction>> {
        let sales = sqlx::query_as::<_, SaleTransaction>(&format!(
            r#"{SALE_SELECT}
            WHERE s.user_id = $1
              AND ($2::uuid IS NULL OR s.product_id = $2)
              AND ($3::uuid IS NULL OR s.grade_id = $3)
            ORDER BY s.date, s.created_at, s.seq
            "#
        ))
        .bind(user_id)
        .bind(query.product_id)
        .bind(query.grade_id)
        .fetch_all(&self.db)
        .await?;

        Ok(sales)
    }

    async fn history(
        &self,
        user_id: Uuid,
        as_of: NaiveDate,
    ) -> AppResult<(Vec<PurchaseLot>, Vec<SaleTransaction>)> {
        let lots = sqlx::query_as::<_, PurchaseLot>(&format!(
            "{LOT_SELECT} WHERE l.user_id = $1 AND l.date <= $2 ORDER BY l.date, l.created_at, l.seq"
        ))
        .bind(user_id)
        .bind(as_of)
        .fetch_all(&self.db)
        .await?;

        let sales = sqlx::query_as::<_, SaleTransaction>(&format!(
            "{SALE_SELECT} WHERE s.user_id = $1 AND s.date <= $2 ORDER BY s.date, s.created_at, s.seq"
        ))
        .bind(user_id)
        .bind(as_of)
        .fetch_all(&self.db)
        .await?;

        Ok((lots, sales))
    }
}
