//! PostgreSQL-backed `LedgerStore` implementation using Diesel ORM.
//!
//! Every unit of work runs inside one database transaction. Row locks come
//! from `SELECT ... FOR UPDATE` and waits are bounded by a transaction-local
//! `lock_timeout`. The transaction commits only when the work returns `Ok`.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{LedgerStore, LedgerStoreError, LedgerTransaction, UnitOfWork};
use crate::domain::{Account, AccountId, TransactionRecord};

use super::diesel_basic_error_mapping::{
    is_lock_timeout, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{AccountRow, AccountUpdate, NewTransactionRow};
use super::pool::{DbPool, PoolError};
use super::schema::{accounts, transactions};

/// Diesel-backed implementation of the ledger store port.
#[derive(Clone)]
pub struct DieselLedgerStore {
    pool: DbPool,
    lock_timeout: Duration,
}

impl DieselLedgerStore {
    /// Create a store whose units of work wait at most `lock_timeout` for
    /// each row lock.
    pub fn new(pool: DbPool, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }
}

fn map_pool_error(error: PoolError) -> LedgerStoreError {
    map_basic_pool_error(error, LedgerStoreError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LedgerStoreError {
    if is_lock_timeout(&error) {
        return LedgerStoreError::lock_timeout(error.to_string());
    }
    map_basic_diesel_error(error, LedgerStoreError::query, LedgerStoreError::connection)
}

/// Outcome of the Diesel transaction callback: either Diesel itself failed
/// (begin, `SET LOCAL`, commit) or the unit of work returned its own error.
enum TxError<E> {
    Diesel(diesel::result::Error),
    Work(E),
}

impl<E> From<diesel::result::Error> for TxError<E> {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

struct DieselTransaction<'c> {
    conn: &'c mut AsyncPgConnection,
    locked: HashSet<AccountId>,
}

#[async_trait]
impl<'c> LedgerTransaction for DieselTransaction<'c> {
    async fn get_account_for_update(
        &mut self,
        id: &AccountId,
    ) -> Result<Option<Account>, LedgerStoreError> {
        let row = accounts::table
            .filter(accounts::id.eq(id.as_uuid()))
            .filter(accounts::deleted_at.is_null())
            .select(AccountRow::as_select())
            .for_update()
            .first::<AccountRow>(&mut *self.conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        self.locked.insert(*id);
        Account::try_from(row)
            .map(Some)
            .map_err(|err| LedgerStoreError::query(err.to_string()))
    }

    async fn update_account(&mut self, account: &Account) -> Result<(), LedgerStoreError> {
        let id = account.id();
        if !self.locked.contains(&id) {
            return Err(LedgerStoreError::query(format!(
                "account {id} updated without holding its lock"
            )));
        }
        let updated = diesel::update(accounts::table.filter(accounts::id.eq(id.as_uuid())))
            .set(AccountUpdate::from(account))
            .execute(&mut *self.conn)
            .await
            .map_err(map_diesel_error)?;
        if updated != 1 {
            return Err(LedgerStoreError::query(format!(
                "account {id} update touched {updated} rows"
            )));
        }
        Ok(())
    }

    async fn append_transaction(
        &mut self,
        record: &TransactionRecord,
    ) -> Result<(), LedgerStoreError> {
        let row = NewTransactionRow::try_from(record)
            .map_err(|err| LedgerStoreError::query(format!("encode metadata: {err}")))?;
        diesel::insert_into(transactions::table)
            .values(&row)
            .execute(&mut *self.conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[async_trait]
impl LedgerStore for DieselLedgerStore {
    async fn in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<LedgerStoreError> + Send + 'static,
        F: for<'t> FnOnce(&'t mut dyn LedgerTransaction) -> UnitOfWork<'t, T, E> + Send + 'static,
    {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let set_lock_timeout = format!(
            "SET LOCAL lock_timeout = '{}ms'",
            self.lock_timeout.as_millis()
        );

        let outcome = conn
            .transaction::<T, TxError<E>, _>(|conn| {
                async move {
                    diesel::sql_query(set_lock_timeout).execute(&mut *conn).await?;
                    let mut tx = DieselTransaction {
                        conn,
                        locked: HashSet::new(),
                    };
                    work(&mut tx).await.map_err(TxError::Work)
                }
                .scope_boxed()
            })
            .await;

        match outcome {
            Ok(value) => Ok(value),
            Err(TxError::Work(err)) => {
                debug!("ledger unit of work rolled back");
                Err(err)
            }
            Err(TxError::Diesel(err)) => Err(E::from(map_diesel_error(err))),
        }
    }
}
