//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, AccountId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AccountRow, NewAccountRow};
use super::page_limit;
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the account repository port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    map_basic_pool_error(error, AccountRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_basic_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn row_to_account(row: AccountRow) -> Result<Account, AccountRepositoryError> {
    Account::try_from(row).map_err(|err| AccountRepositoryError::query(err.to_string()))
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn create(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(accounts::table)
            .values(NewAccountRow::from(account))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = accounts::table
            .filter(accounts::id.eq(id.as_uuid()))
            .filter(accounts::deleted_at.is_null())
            .select(AccountRow::as_select())
            .first::<AccountRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn list(
        &self,
        user_id: Option<UserId>,
        page: &PageRequest<AccountId>,
    ) -> Result<Vec<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = accounts::table
            .filter(accounts::deleted_at.is_null())
            .select(AccountRow::as_select())
            .into_boxed();
        if let Some(owner) = user_id {
            query = query.filter(accounts::user_id.eq(*owner.as_uuid()));
        }
        if let Some(cursor) = page.cursor() {
            query = query.filter(accounts::id.lt(*cursor.as_uuid()));
        }

        let rows: Vec<AccountRow> = query
            .order(accounts::id.desc())
            .limit(page_limit(page))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_account).collect()
    }

    async fn list_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AccountId>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<Uuid> = accounts::table
            .filter(accounts::user_id.eq(user_id.as_uuid()))
            .filter(accounts::deleted_at.is_null())
            .order(accounts::id.desc())
            .select(accounts::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(AccountId::from_uuid).collect())
    }
}
