//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the ledger's driven ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel models
//!   and domain types. Balance rules live in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: database errors map onto each port's error
//!   enum.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use ledger::outbound::persistence::{DbPool, DieselLedgerStore, PoolConfig};
//!
//! # async fn wire() -> Result<(), ledger::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/banking")).await?;
//! let store = DieselLedgerStore::new(pool, Duration::from_secs(5));
//! # let _ = store;
//! # Ok(())
//! # }
//! ```

mod diesel_account_repository;
mod diesel_basic_error_mapping;
mod diesel_journal_repository;
mod diesel_ledger_store;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_journal_repository::DieselJournalRepository;
pub use diesel_ledger_store::DieselLedgerStore;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

/// SQL `LIMIT` for a page request.
fn page_limit<C>(page: &pagination::PageRequest<C>) -> i64 {
    i64::try_from(page.limit()).unwrap_or(i64::MAX)
}
