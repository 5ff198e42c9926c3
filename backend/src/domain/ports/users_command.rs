//! Driving port for registering users.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Domain use-case port for user creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register a user under the given raw display name.
    async fn create_user(&self, name: String) -> Result<User, Error>;
}
