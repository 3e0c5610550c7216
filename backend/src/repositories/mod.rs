//! Storage ports and their adapters
//!
//! Services only see the traits below. Production wires the Postgres ledger
//! store and the Redis price store; tests wire the in-memory adapters.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use shared::models::{
    DailyPrice, Grade, LedgerQuery, NewGrade, NewProduct, NewPurchaseLot, NewSale, NewUser,
    Product, PurchaseLot, SaleTransaction, User,
};

use crate::error::AppResult;

pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::{InMemoryLedgerStore, InMemoryPriceStore};
pub use postgres::{PgGradeRepository, PgLedgerRepository, PgProductRepository, PgUserRepository};
pub use self::redis::RedisPriceRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered
    async fn create(&self, user: NewUser) -> AppResult<User>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn count(&self) -> AppResult<i64>;
    /// Users created in `[from, to)`
    async fn count_created_between(&self, from: DateTime<Utc>, to: DateTime<Utc>)
        -> AppResult<i64>;
    async fn store_refresh_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;
    /// Revoke a live refresh token and return its owner. Expired, revoked or
    /// unknown tokens yield `None`.
    async fn consume_refresh_token(&self, token_hash: &str) -> AppResult<Option<Uuid>>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: NewProduct) -> AppResult<Product>;
    async fn find_all(&self) -> AppResult<Vec<Product>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;
    async fn count(&self) -> AppResult<i64>;
    /// Products created in `[from, to)`
    async fn count_created_between(&self, from: DateTime<Utc>, to: DateTime<Utc>)
        -> AppResult<i64>;
}

#[async_trait]
pub trait GradeRepository: Send + Sync {
    async fn create(&self, grade: NewGrade) -> AppResult<Grade>;
    async fn find_all(&self) -> AppResult<Vec<Grade>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Grade>>;
    async fn find_by_product(&self, product_id: Uuid) -> AppResult<Vec<Grade>>;
    async fn count(&self) -> AppResult<i64>;
}

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn create_lot(&self, lot: NewPurchaseLot) -> AppResult<PurchaseLot>;
    async fn create_sale(&self, sale: NewSale) -> AppResult<SaleTransaction>;
    /// A user's lots matching `query`, oldest date first
    async fn lots(&self, user_id: Uuid, query: &LedgerQuery) -> AppResult<Vec<PurchaseLot>>;
    /// A user's sales matching `query`, oldest date first
    async fn sales(&self, user_id: Uuid, query: &LedgerQuery) -> AppResult<Vec<SaleTransaction>>;
    /// Every lot and sale of a user dated on or before `as_of`, each ordered
    /// by `(date, created_at)`
    async fn history(
        &self,
        user_id: Uuid,
        as_of: NaiveDate,
    ) -> AppResult<(Vec<PurchaseLot>, Vec<SaleTransaction>)>;
}

#[async_trait]
pub trait PriceRepository: Send + Sync {
    /// Overwrites any price already set for the same date and grade
    async fn set_price(&self, price: &DailyPrice) -> AppResult<()>;
    async fn get_price(
        &self,
        date: NaiveDate,
        product_id: Uuid,
        grade_id: Uuid,
    ) -> AppResult<Option<DailyPrice>>;
    async fn prices_for_date(&self, date: NaiveDate) -> AppResult<Vec<DailyPrice>>;
}

/// Handles to every store, cloned into each request
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub grades: Arc<dyn GradeRepository>,
    pub ledger: Arc<dyn LedgerRepository>,
    pub prices: Arc<dyn PriceRepository>,
}

impl Repositories {
    /// Postgres for the ledger and reference data, Redis for prices
    pub fn new(db: sqlx::PgPool, redis: ::redis::aio::ConnectionManager) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(db.clone())),
            products: Arc::new(PgProductRepository::new(db.clone())),
            grades: Arc::new(PgGradeRepository::new(db.clone())),
            ledger: Arc::new(PgLedgerRepository::new(db)),
            prices: Arc::new(RedisPriceRepository::new(redis)),
        }
    }

    /// Everything held in process memory
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryLedgerStore::default()))
    }

    /// In-memory adapters sharing a caller-held ledger store
    pub fn with_store(store: Arc<InMemoryLedgerStore>) -> Self {
        Self {
            users: store.clone(),
            products: store.clone(),
            grades: store.clone(),
            ledger: store,
            prices: Arc::new(InMemoryPriceStore::default()),
        }
    }
}
