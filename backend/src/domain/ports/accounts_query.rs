//! Driving port for account reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Account, AccountId, Error, UserId};

/// A page of accounts keyed by account id.
pub type AccountPage = Page<Account, AccountId>;

/// Domain use-case port for account lookups and listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsQuery: Send + Sync {
    /// Fetch one non-deleted account.
    async fn get_account(&self, id: &AccountId) -> Result<Account, Error>;

    /// List accounts newest first, optionally restricted to one owner.
    async fn list_accounts(
        &self,
        user_id: Option<UserId>,
        page: PageRequest<AccountId>,
    ) -> Result<AccountPage, Error>;
}
