//! Redis price store
//!
//! One key per price: `price:{YYYY-MM-DD}:{product_id}:{grade_id}` holding
//! the JSON-encoded `DailyPrice`. Keys never expire.

use ::redis::{aio::ConnectionManager, AsyncCommands};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use shared::models::DailyPrice;
use shared::types::format_date;

use crate::error::{AppError, AppResult};
use crate::repositories::PriceRepository;

pub fn price_key(date: NaiveDate, product_id: Uuid, grade_id: Uuid) -> String {
    format!("price:{}:{}:{}", format_date(date), product_id, grade_id)
}

fn date_pattern(date: NaiveDate) -> String {
    format!("price:{}:*", format_date(date))
}

#[derive(Clone)]
pub struct RedisPriceRepository {
    conn: ConnectionManager,
}

impl RedisPriceRepository {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

fn decode(key: &str, raw: &str) -> AppResult<DailyPrice> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::PriceStore(format!("Malformed price at {}: {}", key, e)))
}

#[async_trait]
impl PriceRepository for RedisPriceRepository {
    async fn set_price(&self, price: &DailyPrice) -> AppResult<()> {
        let key = price_key(price.date, price.product_id, price.grade_id);
        let value = serde_json::to_string(price)
            .map_err(|e| AppError::Internal(format!("Price serialization failed: {}", e)))?;

        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(&key, value).await?;

        tracing::debug!(key = %key, "Price stored");
        Ok(())
    }

    async fn get_price(
        &self,
        date: NaiveDate,
        product_id: Uuid,
        grade_id: Uuid,
    ) -> AppResult<Option<DailyPrice>> {
        let key = price_key(date, product_id, grade_id);
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(&key).await?;

        raw.map(|raw| decode(&key, &raw)).transpose()
    }

    async fn prices_for_date(&self, date: NaiveDate) -> AppResult<Vec<DailyPrice>> {
        let mut conn = self.conn.clone();

        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter = conn.scan_match::<_, String>(date_pattern(date)).await?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }
        keys.sort();
        keys.dedup();

        let mut prices = Vec::with_capacity(keys.len());
        for key in keys {
            let raw: Option<String> = conn.get(&key).await?;
            // A key can vanish between SCAN and GET
            let Some(raw) = raw else { continue };
            match decode(&key, &raw) {
                Ok(price) => prices.push(price),
                Err(err) => tracing::warn!("Skipping price entry: {}", err),
            }
        }

        Ok(prices)
    }
}
