//! Account owners.

use chrono::{DateTime, Utc};

use super::{AccountId, DisplayName, UserId};

/// A registered account owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: DisplayName,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Register a new user at `now`.
    #[must_use]
    pub fn register(id: UserId, name: DisplayName, now: DateTime<Utc>) -> Self {
        Self::restore(id, name, now, now)
    }

    /// Rebuild a user from persisted state.
    #[must_use]
    pub const fn restore(
        id: UserId,
        name: DisplayName,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            created_at,
            updated_at,
        }
    }

    /// User identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last update time.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// A user together with the identifiers of their live accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetails {
    /// The user.
    pub user: User,
    /// Non-deleted accounts owned by the user, newest first.
    pub account_ids: Vec<AccountId>,
}
