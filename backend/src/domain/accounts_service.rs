//! Account lifecycle and read services.
//!
//! [`AccountsService`] opens accounts for existing users and serves the
//! account and journal read ports. Reads take no row locks.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    AccountPage, AccountRepository, AccountRepositoryError, AccountsCommand, AccountsQuery,
    CreateAccountRequest, IdGenerator, JournalQuery, JournalRepository, JournalRepositoryError,
    TransactionPage, UserRepository,
};
use crate::domain::users_service::map_user_repository_error;
use crate::domain::{
    Account, AccountId, DisplayName, Error, NameError, TransactionId, TransactionRecord, UserId,
};

pub(crate) fn map_account_repository_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::internal(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
    }
}

fn map_journal_repository_error(error: JournalRepositoryError) -> Error {
    match error {
        JournalRepositoryError::Connection { message } => {
            Error::internal(format!("journal repository unavailable: {message}"))
        }
        JournalRepositoryError::Query { message } => {
            Error::internal(format!("journal repository error: {message}"))
        }
    }
}

pub(crate) fn invalid_name(error: &NameError, raw: &str) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": "name",
        "code": error.code(),
        "value": raw,
    }))
}

fn account_not_found(id: &AccountId) -> Error {
    Error::not_found(format!("account_id {id} not found"))
}

/// Service implementing the account command, account query and journal
/// query driving ports.
pub struct AccountsService<A, U, J> {
    accounts: Arc<A>,
    users: Arc<U>,
    journal: Arc<J>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl<A, U, J> AccountsService<A, U, J> {
    /// Create the service over its repositories.
    pub fn new(
        accounts: Arc<A>,
        users: Arc<U>,
        journal: Arc<J>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            users,
            journal,
            ids,
            clock,
        }
    }
}

impl<A, U, J> AccountsService<A, U, J>
where
    A: AccountRepository,
{
    async fn live_account(&self, id: &AccountId) -> Result<Account, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(map_account_repository_error)?
            .ok_or_else(|| account_not_found(id))
    }
}

#[async_trait]
impl<A, U, J> AccountsCommand for AccountsService<A, U, J>
where
    A: AccountRepository,
    U: UserRepository,
    J: Send + Sync,
{
    async fn create_account(&self, request: CreateAccountRequest) -> Result<Account, Error> {
        let CreateAccountRequest { user_id, name } = request;
        let name = DisplayName::new(&name).map_err(|err| invalid_name(&err, &name))?;

        self.users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user_id {user_id} not found")))?;

        let account = Account::open(
            AccountId::from_uuid(self.ids.next_id()),
            user_id,
            name,
            self.clock.utc(),
        );
        self.accounts
            .create(&account)
            .await
            .map_err(map_account_repository_error)?;
        info!(account_id = %account.id(), %user_id, "account opened");
        Ok(account)
    }
}

#[async_trait]
impl<A, U, J> AccountsQuery for AccountsService<A, U, J>
where
    A: AccountRepository,
    U: Send + Sync,
    J: Send + Sync,
{
    async fn get_account(&self, id: &AccountId) -> Result<Account, Error> {
        self.live_account(id).await
    }

    async fn list_accounts(
        &self,
        user_id: Option<UserId>,
        page: PageRequest<AccountId>,
    ) -> Result<AccountPage, Error> {
        let accounts = self
            .accounts
            .list(user_id, &page)
            .await
            .map_err(map_account_repository_error)?;
        Ok(Page::from_items(accounts, &page, Account::id))
    }
}

#[async_trait]
impl<A, U, J> JournalQuery for AccountsService<A, U, J>
where
    A: AccountRepository,
    U: Send + Sync,
    J: JournalRepository,
{
    async fn list_transactions(
        &self,
        account_id: &AccountId,
        page: PageRequest<TransactionId>,
    ) -> Result<TransactionPage, Error> {
        self.live_account(account_id).await?;
        let records = self
            .journal
            .list_for_account(account_id, &page)
            .await
            .map_err(map_journal_repository_error)?;
        Ok(Page::from_items(records, &page, TransactionRecord::id))
    }
}

#[cfg(test)]
#[path = "accounts_service_tests.rs"]
mod tests;
