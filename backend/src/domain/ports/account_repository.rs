//! Port for account persistence outside a unit of work.
//!
//! Reads through this port take no locks and may trail an in-flight
//! mutation.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Account, AccountId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
    }
}

/// Port for creating accounts and reading them back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a newly opened account.
    async fn create(&self, account: &Account) -> Result<(), AccountRepositoryError>;

    /// Find a non-deleted account by id.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError>;

    /// List non-deleted accounts by descending id, optionally for one user.
    ///
    /// Returns at most `page.limit()` accounts whose id sorts strictly
    /// before `page.cursor()` when a cursor is given.
    async fn list(
        &self,
        user_id: Option<UserId>,
        page: &PageRequest<AccountId>,
    ) -> Result<Vec<Account>, AccountRepositoryError>;

    /// Identifiers of every non-deleted account a user owns, newest first.
    async fn list_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AccountId>, AccountRepositoryError>;
}
