//! Admin dashboard: platform counts, growth percentages and price moves

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use shared::models::{
    Dashboard, DashboardGradesSummary, DashboardPriceUpdate, DashboardProductsSummary,
    DashboardUsersSummary,
};
use shared::types::percent_change;

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::repositories::{
    GradeRepository, PriceRepository, ProductRepository, Repositories, UserRepository,
};

#[derive(Clone)]
pub struct DashboardService {
    users: Arc<dyn UserRepository>,
    products: Arc<dyn ProductRepository>,
    grades: Arc<dyn GradeRepository>,
    prices: Arc<dyn PriceRepository>,
}

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub total_users: i64,
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

impl DashboardService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            users: repos.users.clone(),
            products: repos.products.clone(),
            grades: repos.grades.clone(),
            prices: repos.prices.clone(),
        }
    }

    /// Admin only
    pub async fn admin_stats(&self, actor: &AuthUser) -> AppResult<AdminStats> {
        actor.require_admin()?;
        Ok(AdminStats {
            total_users: self.users.count().await?,
        })
    }

    /// Admin only. Windows are half-open and measured in UTC days.
    pub async fn dashboard(&self, actor: &AuthUser, date: NaiveDate) -> AppResult<Dashboard> {
        actor.require_admin()?;

        let day_end = midnight(date + Duration::days(1));
        let this_week = week_start(date);
        let this_month = month_start(date);
        let last_month = month_start(this_month - Duration::days(1));

        // Users
        let total_users = self.users.count().await?;
        let weekly_new = self
            .users
            .count_created_between(midnight(this_week), day_end)
            .await?;
        let previous_weekly_new = self
            .users
            .count_created_between(midnight(this_week - Duration::days(7)), midnight(this_week))
            .await?;
        let users_before_month = self
            .users
            .count_created_between(DateTime::<Utc>::default(), midnight(this_month))
            .await?;

        // Products and grades
        let total_products = self.products.count().await?;
        let products_this_month = self
            .products
            .count_created_between(midnight(this_month), day_end)
            .await?;
        let products_last_month = self
            .products
            .count_created_between(midnight(last_month), midnight(this_month))
            .await?;
        let total_grades = self.grades.count().await?;

        let price_updates = self.price_updates(date).await?;

        Ok(Dashboard {
            date,
            users: DashboardUsersSummary {
                total: total_users,
                weekly_new,
                weekly_change_pct: percent_change(
                    Decimal::from(weekly_new),
                    Decimal::from(previous_weekly_new),
                ),
                monthly_change_pct: percent_change(
                    Decimal::from(total_users),
                    Decimal::from(users_before_month),
                ),
            },
            products: DashboardProductsSummary {
                total: total_products,
                monthly_change_pct: percent_change(
                    Decimal::from(products_this_month),
                    Decimal::from(products_last_month),
                ),
            },
            grades: DashboardGradesSummary {
                total: total_grades,
            },
            total_items: total_products + total_grades,
            price_updates,
        })
    }

    /// Each price set on `date` against the same grade's price the day before
    async fn price_updates(&self, date: NaiveDate) -> AppResult<Vec<DashboardPriceUpdate>> {
        let previous_date = date - Duration::days(1);
        let current = self.prices.prices_for_date(date).await?;
        if current.is_empty() {
            return Ok(Vec::new());
        }

        let product_names: HashMap<Uuid, String> = self
            .products
            .find_all()
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();
        let grade_names: HashMap<Uuid, String> = self
            .grades
            .find_all()
            .await?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();

        let mut updates = Vec::with_capacity(current.len());
        for price in current {
            let previous_price = self
                .prices
                .get_price(previous_date, price.product_id, price.grade_id)
                .await?
                .map(|p| p.price_per_kg)
                .unwrap_or(Decimal::ZERO);

            updates.push(DashboardPriceUpdate {
                date,
                product_id: price.product_id,
                product: product_names
                    .get(&price.product_id)
                    .cloned()
                    .unwrap_or_default(),
                grade_id: price.grade_id,
                grade: grade_names.get(&price.grade_id).cloned().unwrap_or_default(),
                price: price.price_per_kg,
                previous_date,
                previous_price,
                change_delta: price.price_per_kg - previous_price,
                change_percent: percent_change(price.price_per_kg, previous_price),
            });
        }
        updates.sort_by(|a, b| (&a.product, &a.grade).cmp(&(&b.product, &b.grade)));

        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-05-15 is a Wednesday
        assert_eq!(week_start(d(2024, 5, 15)), d(2024, 5, 13));
        assert_eq!(week_start(d(2024, 5, 13)), d(2024, 5, 13));
        // Sunday belongs to the week that began six days earlier
        assert_eq!(week_start(d(2024, 5, 19)), d(2024, 5, 13));
    }

    #[test]
    fn month_start_handles_year_boundary() {
        assert_eq!(month_start(d(2024, 3, 31)), d(2024, 3, 1));
        let this_month = month_start(d(2024, 1, 20));
        assert_eq!(month_start(this_month - Duration::days(1)), d(2023, 12, 1));
    }
}
