//! In-memory adapters for every storage port
//!
//! Used by the integration tests and for running the API without Postgres
//! or Redis. State lives behind a plain mutex; no lock is held across an
//! await point.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use shared::models::{
    DailyPrice, Grade, LedgerQuery, NewGrade, NewProduct, NewPurchaseLot, NewSale, NewUser,
    Product, PurchaseLot, SaleTransaction, User,
};

use super::{GradeRepository, LedgerRepository, PriceRepository, ProductRepository, UserRepository};
use crate::error::{AppError, AppResult};

struct RefreshToken {
    user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
    revoked: bool,
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    refresh_tokens: Vec<RefreshToken>,
    products: Vec<Product>,
    grades: Vec<Grade>,
    lots: Vec<PurchaseLot>,
    sales: Vec<SaleTransaction>,
    last_created_at: Option<DateTime<Utc>>,
    ledger_seq: i64,
}

impl State {
    /// Strictly increasing insertion timestamps, so same-day records always
    /// replay in the order they were written
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(next);
        next
    }

    /// One counter for lots and sales, mirroring the `ledger_seq` sequence
    fn next_ledger_seq(&mut self) -> i64 {
        self.ledger_seq += 1;
        self.ledger_seq
    }

    fn names_for(&self, product_id: Uuid, grade_id: Uuid) -> AppResult<(String, String)> {
        let product = self
            .products
            .iter()
            .find(|p| p.id == product_id)
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
        let grade = self
            .grades
            .iter()
            .find(|g| g.id == grade_id)
            .ok_or_else(|| AppError::NotFound("Grade".to_string()))?;
        Ok((product.name.clone(), grade.name.clone()))
    }
}

/// Users, reference data and the ledger in one process-local store
#[derive(Default)]
pub struct InMemoryLedgerStore {
    state: Mutex<State>,
}

impl InMemoryLedgerStore {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of stored lots and sales across all users
    pub fn ledger_len(&self) -> usize {
        let state = self.state();
        state.lots.len() + state.sales.len()
    }
}

fn in_window(at: DateTime<Utc>, from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    i64::from(at >= from && at < to)
}

#[async_trait]
impl UserRepository for InMemoryLedgerStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut state = self.state();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict {
                resource: "email".to_string(),
                message: "Email is already registered".to_string(),
            });
        }
        let now = state.next_created_at();
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            role: user.role,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.state().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.state().users.iter().find(|u| u.id == id).cloned())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.state().users.len() as i64)
    }

    async fn count_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<i64> {
        Ok(self
            .state()
            .users
            .iter()
            .map(|u| in_window(u.created_at, from, to))
            .sum())
    }

    async fn store_refresh_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.state().refresh_tokens.push(RefreshToken {
            user_id,
            token_hash: token_hash.to_string(),
            expires_at,
            revoked: false,
        });
        Ok(())
    }

    async fn consume_refresh_token(&self, token_hash: &str) -> AppResult<Option<Uuid>> {
        let now = Utc::now();
        let mut state = self.state();
        let token = state
            .refresh_tokens
            .iter_mut()
            .find(|t| t.token_hash == token_hash && !t.revoked && t.expires_at > now);
        Ok(token.map(|t| {
            t.revoked = true;
            t.user_id
        }))
    }
}

#[async_trait]
impl ProductRepository for InMemoryLedgerStore {
    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        let mut state = self.state();
        if state.products.iter().any(|p| p.name == product.name) {
            return Err(AppError::Conflict {
                resource: "product".to_string(),
                message: "A product with this name already exists".to_string(),
            });
        }
        let product = Product {
            id: Uuid::new_v4(),
            name: product.name,
            description: product.description,
            created_at: state.next_created_at(),
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn find_all(&self) -> AppResult<Vec<Product>> {
        let mut products = self.state().products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        Ok(self.state().products.iter().find(|p| p.id == id).cloned())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.state().products.len() as i64)
    }

    async fn count_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<i64> {
        Ok(self
            .state()
            .products
            .iter()
            .map(|p| in_window(p.created_at, from, to))
            .sum())
    }
}

#[async_trait]
impl GradeRepository for InMemoryLedgerStore {
    async fn create(&self, grade: NewGrade) -> AppResult<Grade> {
        let mut state = self.state();
        if state
            .grades
            .iter()
            .any(|g| g.product_id == grade.product_id && g.name == grade.name)
        {
            return Err(AppError::Conflict {
                resource: "grade".to_string(),
                message: "This product already has a grade with this name".to_string(),
            });
        }
        let grade = Grade {
            id: Uuid::new_v4(),
            product_id: grade.product_id,
            name: grade.name,
            description: grade.description,
            created_at: state.next_created_at(),
        };
        state.grades.push(grade.clone());
        Ok(grade)
    }

    async fn find_all(&self) -> AppResult<Vec<Grade>> {
        let mut grades = self.state().grades.clone();
        grades.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(grades)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Grade>> {
        Ok(self.state().grades.iter().find(|g| g.id == id).cloned())
    }

    async fn find_by_product(&self, product_id: Uuid) -> AppResult<Vec<Grade>> {
        let mut grades: Vec<Grade> = self
            .state()
            .grades
            .iter()
            .filter(|g| g.product_id == product_id)
            .cloned()
            .collect();
        grades.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(grades)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.state().grades.len() as i64)
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerStore {
    async fn create_lot(&self, lot: NewPurchaseLot) -> AppResult<PurchaseLot> {
        let mut state = self.state();
        let (product, grade) = state.names_for(lot.product_id, lot.grade_id)?;
        let lot = PurchaseLot {
            id: Uuid::new_v4(),
            user_id: lot.user_id,
            product_id: lot.product_id,
            product,
            grade_id: lot.grade_id,
            grade,
            date: lot.date,
            quantity_kg: lot.quantity_kg,
            unit_cost: lot.unit_cost,
            created_at: state.next_created_at(),
            seq: state.next_ledger_seq(),
        };
        state.lots.push(lot.clone());
        Ok(lot)
    }

    async fn create_sale(&self, sale: NewSale) -> AppResult<SaleTransaction> {
        let mut state = self.state();
        let (product, grade) = state.names_for(sale.product_id, sale.grade_id)?;
        let sale = SaleTransaction {
            id: Uuid::new_v4(),
            user_id: sale.user_id,
            product_id: sale.product_id,
            product,
            grade_id: sale.grade_id,
            grade,
            date: sale.date,
            quantity_kg: sale.quantity_kg,
            unit_price: sale.unit_price,
            created_at: state.next_created_at(),
            seq: state.next_ledger_seq(),
        };
        state.sales.push(sale.clone());
        Ok(sale)
    }

    async fn lots(&self, user_id: Uuid, query: &LedgerQuery) -> AppResult<Vec<PurchaseLot>> {
        let mut lots: Vec<PurchaseLot> = self
            .state()
            .lots
            .iter()
            .filter(|l| l.user_id == user_id && query.matches(l.product_id, l.grade_id))
            .cloned()
            .collect();
        lots.sort_by_key(|l| (l.date, l.created_at, l.seq));
        Ok(lots)
    }

    async fn sales(&self, user_id: Uuid, query: &LedgerQuery) -> AppResult<Vec<SaleTransaction>> {
        let mut sales: Vec<SaleTransaction> = self
            .state()
            .sales
            .iter()
            .filter(|s| s.user_id == user_id && query.matches(s.product_id, s.grade_id))
            .cloned()
            .collect();
        sales.sort_by_key(|s| (s.date, s.created_at, s.seq));
        Ok(sales)
    }

    async fn history(
        &self,
        user_id: Uuid,
        as_of: NaiveDate,
    ) -> AppResult<(Vec<PurchaseLot>, Vec<SaleTransaction>)> {
        let state = self.state();
        let mut lots: Vec<PurchaseLot> = state
            .lots
            .iter()
            .filter(|l| l.user_id == user_id && l.date <= as_of)
            .cloned()
            .collect();
        let mut sales: Vec<SaleTransaction> = state
            .sales
            .iter()
            .filter(|s| s.user_id == user_id && s.date <= as_of)
            .cloned()
            .collect();
        lots.sort_by_key(|l| (l.date, l.created_at, l.seq));
        sales.sort_by_key(|s| (s.date, s.created_at, s.seq));
        Ok((lots, sales))
    }
}

/// Daily prices keyed the same way as the Redis store
#[derive(Default)]
pub struct InMemoryPriceStore {
    prices: Mutex<BTreeMap<(NaiveDate, Uuid, Uuid), DailyPrice>>,
}

impl InMemoryPriceStore {
    fn prices(&self) -> MutexGuard<'_, BTreeMap<(NaiveDate, Uuid, Uuid), DailyPrice>> {
        self.prices.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PriceRepository for InMemoryPriceStore {
    async fn set_price(&self, price: &DailyPrice) -> AppResult<()> {
        self.prices()
            .insert((price.date, price.product_id, price.grade_id), price.clone());
        Ok(())
    }

    async fn get_price(
        &self,
        date: NaiveDate,
        product_id: Uuid,
        grade_id: Uuid,
    ) -> AppResult<Option<DailyPrice>> {
        Ok(self.prices().get(&(date, product_id, grade_id)).cloned())
    }

    async fn prices_for_date(&self, date: NaiveDate) -> AppResult<Vec<DailyPrice>> {
        Ok(self
            .prices()
            .values()
            .filter(|p| p.date == date)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use shared::models::Role;

    async fn seeded() -> (InMemoryLedgerStore, Product, Grade) {
        let store = InMemoryLedgerStore::default();
        let product = ProductRepository::create(
            &store,
            NewProduct {
                name: "Clove".into(),
                description: String::new(),
            },
        )
        .await
        .unwrap();
        let grade = GradeRepository::create(
            &store,
            NewGrade {
                product_id: product.id,
                name: "Hand Picked".into(),
                description: String::new(),
            },
        )
        .await
        .unwrap();
        (store, product, grade)
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = InMemoryLedgerStore::default();
        let new_user = || NewUser {
            email: "dup@example.com".into(),
            name: "Dup".into(),
            role: Role::User,
            password_hash: "x".into(),
        };
        UserRepository::create(&store, new_user()).await.unwrap();
        let err = UserRepository::create(&store, new_user()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn refresh_token_is_single_use() {
        let store = InMemoryLedgerStore::default();
        let user_id = Uuid::new_v4();
        let expires = Utc::now() + Duration::hours(1);
        store.store_refresh_token(user_id, "abc", expires).await.unwrap();

        assert_eq!(store.consume_refresh_token("abc").await.unwrap(), Some(user_id));
        assert_eq!(store.consume_refresh_token("abc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn history_stops_at_as_of_date() {
        let (store, product, grade) = seeded().await;
        let user_id = Uuid::new_v4();
        for day in [3, 1, 2] {
            store
                .create_lot(NewPurchaseLot {
                    user_id,
                    product_id: product.id,
                    grade_id: grade.id,
                    date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
                    quantity_kg: dec!(1),
                    unit_cost: dec!(1),
                })
                .await
                .unwrap();
        }

        let as_of = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let (lots, sales) = store.history(user_id, as_of).await.unwrap();
        assert!(sales.is_empty());
        let days: Vec<_> = lots.iter().map(|l| l.date).collect();
        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
            ]
        );
        assert_eq!(lots[0].product, "Clove");
    }

    #[tokio::test]
    async fn lots_and_sales_share_one_sequence() {
        let (store, product, grade) = seeded().await;
        let user_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let lot = store
            .create_lot(NewPurchaseLot {
                user_id,
                product_id: product.id,
                grade_id: grade.id,
                date,
                quantity_kg: dec!(5),
                unit_cost: dec!(2),
            })
            .await
            .unwrap();
        let sale = store
            .create_sale(NewSale {
                user_id,
                product_id: product.id,
                grade_id: grade.id,
                date,
                quantity_kg: dec!(1),
                unit_price: dec!(3),
            })
            .await
            .unwrap();
        let second_lot = store
            .create_lot(NewPurchaseLot {
                user_id,
                product_id: product.id,
                grade_id: grade.id,
                date,
                quantity_kg: dec!(1),
                unit_cost: dec!(2),
            })
            .await
            .unwrap();

        assert!(lot.seq < sale.seq);
        assert!(sale.seq < second_lot.seq);
    }

    #[tokio::test]
    async fn price_is_overwritten() {
        let store = InMemoryPriceStore::default();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let (p, g) = (Uuid::new_v4(), Uuid::new_v4());
        for price in [dec!(10), dec!(12)] {
            store
                .set_price(&DailyPrice {
                    date,
                    product_id: p,
                    grade_id: g,
                    price_per_kg: price,
                })
                .await
                .unwrap();
        }
        let stored = store.get_price(date, p, g).await.unwrap().unwrap();
        assert_eq!(stored.price_per_kg, dec!(12));
        assert_eq!(store.prices_for_date(date).await.unwrap().len(), 1);
    }
}
