//! User registration and read services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::accounts_service::{invalid_name, map_account_repository_error};
use crate::domain::ports::{
    AccountRepository, IdGenerator, UserPage, UserRepository, UserRepositoryError, UsersCommand,
    UsersQuery,
};
use crate::domain::{DisplayName, Error, User, UserDetails, UserId};

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Service implementing the user command and query driving ports.
pub struct UsersService<U, A> {
    users: Arc<U>,
    accounts: Arc<A>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl<U, A> UsersService<U, A> {
    /// Create the service over the user and account repositories.
    pub fn new(
        users: Arc<U>,
        accounts: Arc<A>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            accounts,
            ids,
            clock,
        }
    }
}

#[async_trait]
impl<U, A> UsersCommand for UsersService<U, A>
where
    U: UserRepository,
    A: Send + Sync,
{
    async fn create_user(&self, name: String) -> Result<User, Error> {
        let display_name = DisplayName::new(&name).map_err(|err| invalid_name(&err, &name))?;
        let user = User::register(
            UserId::from_uuid(self.ids.next_id()),
            display_name,
            self.clock.utc(),
        );
        self.users
            .create(&user)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }
}

#[async_trait]
impl<U, A> UsersQuery for UsersService<U, A>
where
    U: UserRepository,
    A: AccountRepository,
{
    async fn get_user(&self, id: &UserId) -> Result<UserDetails, Error> {
        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user_id {id} not found")))?;
        let account_ids = self
            .accounts
            .list_ids_for_user(id)
            .await
            .map_err(map_account_repository_error)?;
        Ok(UserDetails { user, account_ids })
    }

    async fn list_users(&self, page: PageRequest<UserId>) -> Result<UserPage, Error> {
        let users = self
            .users
            .list(&page)
            .await
            .map_err(map_user_repository_error)?;
        Ok(Page::from_items(users, &page, User::id))
    }
}
