//! Property tests for the inventory valuation engine

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::models::{DailyPrice, PurchaseLot, SaleTransaction};
use shared::valuation::{replay, value_inventory, Event, EventKind};

// ============================================================================
// Strategies
// ============================================================================

/// Quantities between 0.01 and 1000 kg in hundredths
fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000).prop_map(|n| Decimal::new(n, 2))
}

/// Unit amounts between 0 and 500 in hundredths
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..50_000).prop_map(|n| Decimal::new(n, 2))
}

fn trades_strategy() -> impl Strategy<Value = Vec<(Decimal, Decimal)>> {
    prop::collection::vec((quantity_strategy(), amount_strategy()), 1..20)
}

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
}

fn at(seq: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(seq)
}

fn event(kind: EventKind, seq: i64, quantity: Decimal, unit_amount: Decimal) -> Event {
    Event {
        date: day(seq),
        created_at: at(seq),
        seq,
        kind,
        quantity,
        unit_amount,
    }
}

fn lots(user_id: Uuid, product_id: Uuid, grade_id: Uuid, trades: &[(Decimal, Decimal)]) -> Vec<PurchaseLot> {
    trades
        .iter()
        .enumerate()
        .map(|(i, (quantity, cost))| PurchaseLot {
            id: Uuid::new_v4(),
            user_id,
            product_id,
            product: "Cardamom".to_string(),
            grade_id,
            grade: "Bold".to_string(),
            date: day(i as i64),
            quantity_kg: *quantity,
            unit_cost: *cost,
            created_at: at(i as i64),
            seq: i as i64,
        })
        .collect()
}

proptest! {
    /// Buys alone accumulate the exact cost basis
    #[test]
    fn prop_buys_accumulate_cost_basis(trades in trades_strategy()) {
        let events: Vec<Event> = trades
            .iter()
            .enumerate()
            .map(|(i, (q, c))| event(EventKind::Buy, i as i64, *q, *c))
            .collect();

        let position = replay(&events);
        let quantity: Decimal = trades.iter().map(|(q, _)| *q).sum();
        let cost: Decimal = trades.iter().map(|(q, c)| *q * *c).sum();

        prop_assert_eq!(position.quantity, quantity);
        prop_assert_eq!(position.cost_basis, cost);
        prop_assert_eq!(position.average_cost(), cost / quantity);
    }

    /// Selling everything on hand empties the position
    #[test]
    fn prop_selling_everything_empties_position(
        trades in trades_strategy(),
        sale_price in amount_strategy(),
    ) {
        let mut events: Vec<Event> = trades
            .iter()
            .enumerate()
            .map(|(i, (q, c))| event(EventKind::Buy, i as i64, *q, *c))
            .collect();
        let on_hand: Decimal = trades.iter().map(|(q, _)| *q).sum();
        events.push(event(EventKind::Sell, trades.len() as i64, on_hand, sale_price));

        let position = replay(&events);
        prop_assert_eq!(position.quantity, Decimal::ZERO);
        prop_assert_eq!(position.cost_basis, Decimal::ZERO);
    }

    /// Selling from an empty position only moves the quantity
    #[test]
    fn prop_selling_short_keeps_cost_basis(trades in trades_strategy()) {
        let events: Vec<Event> = trades
            .iter()
            .enumerate()
            .map(|(i, (q, p))| event(EventKind::Sell, i as i64, *q, *p))
            .collect();

        let position = replay(&events);
        let sold: Decimal = trades.iter().map(|(q, _)| *q).sum();
        prop_assert_eq!(position.quantity, -sold);
        prop_assert_eq!(position.cost_basis, Decimal::ZERO);
    }

    /// Valuation is a pure function of its inputs
    #[test]
    fn prop_valuation_is_idempotent(trades in trades_strategy(), price in amount_strategy()) {
        let (user, product, grade) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let lots = lots(user, product, grade, &trades);
        let as_of = day(trades.len() as i64);
        let prices = vec![DailyPrice { date: as_of, product_id: product, grade_id: grade, price_per_kg: price }];

        let first = value_inventory(as_of, &lots, &[], &prices);
        let second = value_inventory(as_of, &lots, &[], &prices);
        prop_assert_eq!(first, second);
    }

    /// Without a market price the whole cost basis shows as a loss
    #[test]
    fn prop_missing_price_values_at_zero(trades in trades_strategy()) {
        let (user, product, grade) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let lots = lots(user, product, grade, &trades);
        let sales: Vec<SaleTransaction> = Vec::new();

        let inventory = value_inventory(day(trades.len() as i64), &lots, &sales, &[]);
        let snapshot = &inventory.snapshots[0];
        prop_assert_eq!(snapshot.market_price, Decimal::ZERO);
        prop_assert_eq!(snapshot.market_value, Decimal::ZERO);
        prop_assert_eq!(snapshot.unrealized_pnl, -snapshot.total_cost_basis);
    }
}

#[test]
fn same_day_order_follows_insertion_time() {
    let date = day(0);
    let buy = |seq, q: i64, c: i64| Event {
        date,
        created_at: at(seq),
        seq,
        kind: EventKind::Buy,
        quantity: Decimal::from(q),
        unit_amount: Decimal::from(c),
    };
    let sell = |seq, q: i64| Event {
        date,
        created_at: at(seq),
        seq,
        kind: EventKind::Sell,
        quantity: Decimal::from(q),
        unit_amount: Decimal::from(50),
    };

    // Opening stock of 10 @ 10, then a same-day sell and buy in either order
    let sell_first = replay(&[buy(0, 10, 10), sell(1, 5), buy(2, 5, 20)]);
    let buy_first = replay(&[buy(0, 10, 10), buy(1, 5, 20), sell(2, 5)]);

    assert_eq!(sell_first.quantity, buy_first.quantity);
    assert_eq!(sell_first.cost_basis, Decimal::from(150));
    assert_ne!(sell_first.cost_basis, buy_first.cost_basis);
}
