//! Inventory valuation engine
//!
//! Rebuilds the weighted-average cost basis of every product/grade a user
//! holds by replaying the ledger in chronological order, then marks each
//! position to the market price of the valuation date.
//!
//! Replay rules for one product/grade:
//! - `Buy(q, c)`: quantity += q, cost basis += q * c
//! - `Sell(q, p)` with stock on hand: cost basis -= q * (cost basis / quantity),
//!   quantity -= q. The sale price `p` never touches the cost basis.
//! - `Sell(q, p)` with nothing on hand: quantity -= q, cost basis unchanged.
//!
//! After the replay a quantity within [`QUANTITY_EPSILON`] of zero snaps the
//! position (quantity and cost) to exactly zero.

pub mod day;

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    DailyPrice, InventorySnapshot, OverallInventory, ProductInventory, PurchaseLot,
    SaleTransaction,
};
use crate::types::{percent_of, QUANTITY_EPSILON};

pub use day::compute_day_details;

/// Direction of a ledger event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Buy,
    Sell,
}

/// A lot or a sale seen through one lens for replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub date: NaiveDate,
    /// Insertion time, breaks ties between events on the same date
    pub created_at: DateTime<Utc>,
    /// Insertion sequence, breaks ties between equal timestamps
    pub seq: i64,
    pub kind: EventKind,
    pub quantity: Decimal,
    /// Unit cost for a buy, unit price for a sell
    pub unit_amount: Decimal,
}

impl From<&PurchaseLot> for Event {
    fn from(lot: &PurchaseLot) -> Self {
        Self {
            date: lot.date,
            created_at: lot.created_at,
            seq: lot.seq,
            kind: EventKind::Buy,
            quantity: lot.quantity_kg,
            unit_amount: lot.unit_cost,
        }
    }
}

impl From<&SaleTransaction> for Event {
    fn from(sale: &SaleTransaction) -> Self {
        Self {
            date: sale.date,
            created_at: sale.created_at,
            seq: sale.seq,
            kind: EventKind::Sell,
            quantity: sale.quantity_kg,
            unit_amount: sale.unit_price,
        }
    }
}

/// Running quantity and cost basis of one product/grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub quantity: Decimal,
    pub cost_basis: Decimal,
}

impl Position {
    /// Apply one event to the running position
    pub fn apply(&mut self, event: &Event) {
        match event.kind {
            EventKind::Buy => {
                self.quantity += event.quantity;
                self.cost_basis += event.quantity * event.unit_amount;
            }
            EventKind::Sell if self.quantity > Decimal::ZERO => {
                let avg_cost = self.cost_basis / self.quantity;
                self.quantity -= event.quantity;
                self.cost_basis -= event.quantity * avg_cost;
            }
            EventKind::Sell => {
                self.quantity -= event.quantity;
            }
        }
    }

    /// Snap rounding residue around an empty position to exactly zero
    pub fn settle(self) -> Self {
        if self.quantity.abs() < QUANTITY_EPSILON {
            Self::default()
        } else {
            self
        }
    }

    /// Weighted-average cost per kg, zero unless stock is on hand
    pub fn average_cost(&self) -> Decimal {
        if self.quantity > Decimal::ZERO {
            self.cost_basis / self.quantity
        } else {
            Decimal::ZERO
        }
    }
}

/// Identity of a product/grade partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupKey {
    pub product_id: Uuid,
    pub product: String,
    pub grade_id: Uuid,
    pub grade: String,
}

/// Order events by date, then insertion time, then insertion sequence. The
/// sort is stable, so events with equal keys keep the order they were
/// supplied in.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by_key(|e| (e.date, e.created_at, e.seq));
}

/// Replay already-ordered events into a settled position
pub fn replay(events: &[Event]) -> Position {
    events
        .iter()
        .fold(Position::default(), |mut position, event| {
            position.apply(event);
            position
        })
        .settle()
}

/// Replay one group's ordered events and value the result at `market_price`.
/// A missing price values the position at zero.
pub fn compute_snapshot(
    key: &GroupKey,
    events: &[Event],
    market_price: Option<Decimal>,
) -> InventorySnapshot {
    let position = replay(events);
    let market_price = market_price.unwrap_or(Decimal::ZERO);
    let market_value = position.quantity * market_price;

    InventorySnapshot {
        product_id: key.product_id,
        product: key.product.clone(),
        grade_id: key.grade_id,
        grade: key.grade.clone(),
        total_quantity: position.quantity,
        average_cost: position.average_cost(),
        total_cost_basis: position.cost_basis,
        market_price,
        market_value,
        unrealized_pnl: market_value - position.cost_basis,
    }
}

/// Value a user's whole ledger as of `as_of`.
///
/// `lots` and `sales` are expected to hold only records dated on or before
/// `as_of`; `prices` are the market prices for `as_of`. Snapshots come back
/// sorted by product then grade name.
pub fn value_inventory(
    as_of: NaiveDate,
    lots: &[PurchaseLot],
    sales: &[SaleTransaction],
    prices: &[DailyPrice],
) -> OverallInventory {
    let mut groups: BTreeMap<(Uuid, Uuid), (GroupKey, Vec<Event>)> = BTreeMap::new();

    for lot in lots {
        groups
            .entry((lot.product_id, lot.grade_id))
            .or_insert_with(|| {
                let key = GroupKey {
                    product_id: lot.product_id,
                    product: lot.product.clone(),
                    grade_id: lot.grade_id,
                    grade: lot.grade.clone(),
                };
                (key, Vec::new())
            })
            .1
            .push(Event::from(lot));
    }
    for sale in sales {
        groups
            .entry((sale.product_id, sale.grade_id))
            .or_insert_with(|| {
                let key = GroupKey {
                    product_id: sale.product_id,
                    product: sale.product.clone(),
                    grade_id: sale.grade_id,
                    grade: sale.grade.clone(),
                };
                (key, Vec::new())
            })
            .1
            .push(Event::from(sale));
    }

    let price_by_grade: BTreeMap<(Uuid, Uuid), Decimal> = prices
        .iter()
        .map(|p| ((p.product_id, p.grade_id), p.price_per_kg))
        .collect();

    let mut snapshots: Vec<InventorySnapshot> = groups
        .into_iter()
        .map(|(id, (key, mut events))| {
            sort_events(&mut events);
            compute_snapshot(&key, &events, price_by_grade.get(&id).copied())
        })
        .collect();
    snapshots.sort_by(|a, b| (&a.product, &a.grade).cmp(&(&b.product, &b.grade)));

    aggregate(as_of, snapshots)
}

/// Roll snapshots up per product and overall
fn aggregate(as_of: NaiveDate, snapshots: Vec<InventorySnapshot>) -> OverallInventory {
    let mut products: Vec<ProductInventory> = Vec::new();

    for snapshot in &snapshots {
        let index = match products
            .iter()
            .position(|p| p.product_id == snapshot.product_id)
        {
            Some(index) => index,
            None => {
                products.push(ProductInventory {
                    product_id: snapshot.product_id,
                    product: snapshot.product.clone(),
                    grades: Vec::new(),
                    total_quantity: Decimal::ZERO,
                    total_value: Decimal::ZERO,
                    total_cost: Decimal::ZERO,
                    total_pnl: Decimal::ZERO,
                    total_pnl_pct: Decimal::ZERO,
                });
                products.len() - 1
            }
        };

        let product = &mut products[index];
        product.total_quantity += snapshot.total_quantity;
        product.total_value += snapshot.market_value;
        product.total_cost += snapshot.total_cost_basis;
        product.total_pnl += snapshot.unrealized_pnl;
        product.grades.push(snapshot.clone());
    }

    for product in &mut products {
        product.total_pnl_pct = percent_of(product.total_pnl, product.total_cost);
    }

    let total_quantity = snapshots.iter().map(|s| s.total_quantity).sum();
    let total_value = snapshots.iter().map(|s| s.market_value).sum();
    let total_cost: Decimal = snapshots.iter().map(|s| s.total_cost_basis).sum();
    let total_pnl: Decimal = snapshots.iter().map(|s| s.unrealized_pnl).sum();

    OverallInventory {
        date: as_of,
        snapshots,
        products,
        total_quantity,
        total_value,
        total_cost,
        total_pnl,
        total_pnl_pct: percent_of(total_pnl, total_cost),
    }
}
