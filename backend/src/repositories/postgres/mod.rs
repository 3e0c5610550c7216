//! PostgreSQL ledger store

mod catalog;
mod ledger;
mod user;

pub use catalog::{PgGradeRepository, PgProductRepository};
pub use ledger::PgLedgerRepository;
pub use user::PgUserRepository;

/// Whether `err` is a unique-constraint violation
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
