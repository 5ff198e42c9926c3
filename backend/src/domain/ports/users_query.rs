//! Driving port for user reads.
//!
//! Inbound adapters fetch user-visible data through this port without
//! importing persistence concerns.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, User, UserDetails, UserId};

/// A page of users keyed by user id.
pub type UserPage = Page<User, UserId>;

/// Domain use-case port for user lookups and listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch a user with the ids of their live accounts.
    async fn get_user(&self, id: &UserId) -> Result<UserDetails, Error>;

    /// List users newest first.
    async fn list_users(&self, page: PageRequest<UserId>) -> Result<UserPage, Error>;
}
