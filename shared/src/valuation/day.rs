//! Same-day trading summary
//!
//! `day_pnl` compares the day's average sell price with the day's own
//! average buy cost. Stock carried in from earlier days is ignored, so this
//! is a narrower figure than the unrealized P&L of a valuation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{DayGradeDetail, DayInventory, PurchaseLot, SaleTransaction};

#[derive(Default)]
struct DayTotals {
    product: String,
    grade: String,
    bought_qty: Decimal,
    bought_cost_sum: Decimal,
    sold_qty: Decimal,
    sold_price_sum: Decimal,
}

fn average(sum: Decimal, qty: Decimal) -> Decimal {
    if qty > Decimal::ZERO {
        sum / qty
    } else {
        Decimal::ZERO
    }
}

/// Summarise the lots and sales dated exactly `date`, per product/grade.
/// Records on other dates are ignored, so callers may pass a full ledger.
pub fn compute_day_details(
    date: NaiveDate,
    lots: &[PurchaseLot],
    sales: &[SaleTransaction],
) -> DayInventory {
    let mut groups: BTreeMap<(Uuid, Uuid), DayTotals> = BTreeMap::new();

    for lot in lots.iter().filter(|l| l.date == date) {
        let totals = groups
            .entry((lot.product_id, lot.grade_id))
            .or_insert_with(|| DayTotals {
                product: lot.product.clone(),
                grade: lot.grade.clone(),
                ..Default::default()
            });
        totals.bought_qty += lot.quantity_kg;
        totals.bought_cost_sum += lot.quantity_kg * lot.unit_cost;
    }

    for sale in sales.iter().filter(|s| s.date == date) {
        let totals = groups
            .entry((sale.product_id, sale.grade_id))
            .or_insert_with(|| DayTotals {
                product: sale.product.clone(),
                grade: sale.grade.clone(),
                ..Default::default()
            });
        totals.sold_qty += sale.quantity_kg;
        totals.sold_price_sum += sale.quantity_kg * sale.unit_price;
    }

    let mut grades: Vec<DayGradeDetail> = groups
        .into_iter()
        .map(|((product_id, grade_id), t)| {
            let bought_avg_cost = average(t.bought_cost_sum, t.bought_qty);
            let sold_avg_price = average(t.sold_price_sum, t.sold_qty);
            DayGradeDetail {
                product_id,
                product: t.product,
                grade_id,
                grade: t.grade,
                bought_qty: t.bought_qty,
                bought_avg_cost,
                sold_qty: t.sold_qty,
                sold_avg_price,
                day_pnl: t.sold_qty * (sold_avg_price - bought_avg_cost),
            }
        })
        .collect();
    grades.sort_by(|a, b| (&a.product, &a.grade).cmp(&(&b.product, &b.grade)));

    DayInventory {
        date,
        total_bought: grades.iter().map(|g| g.bought_qty).sum(),
        total_sold: grades.iter().map(|g| g.sold_qty).sum(),
        total_day_pnl: grades.iter().map(|g| g.day_pnl).sum(),
        grades,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    const PRODUCT: Uuid = Uuid::from_u128(7);
    const GRADE: Uuid = Uuid::from_u128(70);

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    fn lot(d: u32, qty: Decimal, cost: Decimal) -> PurchaseLot {
        PurchaseLot {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            product_id: PRODUCT,
            product: "Turmeric".into(),
            grade_id: GRADE,
            grade: "Alleppey Finger".into(),
            date: date(d),
            quantity_kg: qty,
            unit_cost: cost,
            created_at: Utc::now(),
            seq: d as i64,
        }
    }

    fn sale(d: u32, qty: Decimal, price: Decimal) -> SaleTransaction {
        SaleTransaction {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            product_id: PRODUCT,
            product: "Turmeric".into(),
            grade_id: GRADE,
            grade: "Alleppey Finger".into(),
            date: date(d),
            quantity_kg: qty,
            unit_price: price,
            created_at: Utc::now(),
            seq: d as i64,
        }
    }

    #[test]
    fn buy_and_sell_on_same_day() {
        let day = compute_day_details(
            date(3),
            &[lot(3, dec!(10), dec!(5))],
            &[sale(3, dec!(4), dec!(8))],
        );
        assert_eq!(day.grades.len(), 1);
        let g = &day.grades[0];
        assert_eq!(g.bought_avg_cost, dec!(5));
        assert_eq!(g.sold_avg_price, dec!(8));
        assert_eq!(g.day_pnl, dec!(12));
        assert_eq!(day.total_day_pnl, dec!(12));
    }

    #[test]
    fn other_days_are_ignored() {
        let day = compute_day_details(
            date(3),
            &[lot(2, dec!(100), dec!(1)), lot(3, dec!(10), dec!(6))],
            &[sale(4, dec!(50), dec!(9))],
        );
        assert_eq!(day.total_bought, dec!(10));
        assert_eq!(day.total_sold, Decimal::ZERO);
        assert_eq!(day.grades[0].sold_avg_price, Decimal::ZERO);
        assert_eq!(day.total_day_pnl, Decimal::ZERO);
    }

    #[test]
    fn sale_without_same_day_purchase_uses_zero_cost() {
        let day = compute_day_details(date(5), &[], &[sale(5, dec!(2), dec!(30))]);
        assert_eq!(day.grades[0].bought_avg_cost, Decimal::ZERO);
        assert_eq!(day.grades[0].day_pnl, dec!(60));
    }

    #[test]
    fn averages_are_quantity_weighted() {
        let day = compute_day_details(
            date(6),
            &[lot(6, dec!(30), dec!(10)), lot(6, dec!(10), dec!(14))],
            &[sale(6, dec!(5), dec!(12)), sale(6, dec!(15), dec!(16))],
        );
        let g = &day.grades[0];
        assert_eq!(g.bought_avg_cost, dec!(11));
        assert_eq!(g.sold_avg_price, dec!(15));
        assert_eq!(g.day_pnl, dec!(80));
    }

    #[test]
    fn quiet_day_is_empty() {
        let day = compute_day_details(date(9), &[lot(1, dec!(1), dec!(1))], &[]);
        assert!(day.grades.is_empty());
        assert_eq!(day.date, date(9));
    }
}
