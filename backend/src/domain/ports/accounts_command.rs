//! Driving port for opening accounts.

use async_trait::async_trait;

use crate::domain::{Account, Error, UserId};

/// Open an account with a zero balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountRequest {
    /// Owner of the new account.
    pub user_id: UserId,
    /// Raw display name; validated by the service.
    pub name: String,
}

/// Domain use-case port for account creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Open an account for an existing user.
    async fn create_account(&self, request: CreateAccountRequest) -> Result<Account, Error>;
}
