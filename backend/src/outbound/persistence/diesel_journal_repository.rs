//! PostgreSQL-backed `JournalRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{JournalRepository, JournalRepositoryError};
use crate::domain::{AccountId, TransactionId, TransactionRecord};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::TransactionRow;
use super::page_limit;
use super::pool::{DbPool, PoolError};
use super::schema::transactions;

/// Diesel-backed implementation of the journal repository port.
#[derive(Clone)]
pub struct DieselJournalRepository {
    pool: DbPool,
}

impl DieselJournalRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> JournalRepositoryError {
    map_basic_pool_error(error, JournalRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> JournalRepositoryError {
    map_basic_diesel_error(
        error,
        JournalRepositoryError::query,
        JournalRepositoryError::connection,
    )
}

#[async_trait]
impl JournalRepository for DieselJournalRepository {
    async fn list_for_account(
        &self,
        account_id: &AccountId,
        page: &PageRequest<TransactionId>,
    ) -> Result<Vec<TransactionRecord>, JournalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = transactions::table
            .filter(transactions::account_id.eq(*account_id.as_uuid()))
            .select(TransactionRow::as_select())
            .into_boxed();
        if let Some(cursor) = page.cursor() {
            query = query.filter(transactions::id.lt(*cursor.as_uuid()));
        }

        let rows: Vec<TransactionRow> = query
            .order(transactions::id.desc())
            .limit(page_limit(page))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| {
                TransactionRecord::try_from(row)
                    .map_err(|err| JournalRepositoryError::query(err.to_string()))
            })
            .collect()
    }
}
