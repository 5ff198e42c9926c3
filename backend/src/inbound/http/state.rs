//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` and only depend on
//! domain ports, which keeps them testable without I/O.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tokio::time::Instant;

use crate::domain::ports::{
    AccountRepository, AccountsCommand, AccountsQuery, IdGenerator, JournalQuery,
    JournalRepository, LedgerCommand, LedgerStore, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{AccountsService, LedgerService, UsersService};

/// Deadline applied to mutations when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub ledger: Arc<dyn LedgerCommand>,
    pub accounts: Arc<dyn AccountsCommand>,
    pub accounts_query: Arc<dyn AccountsQuery>,
    pub journal: Arc<dyn JournalQuery>,
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
}

impl HttpStatePorts {
    /// Wire the ledger services over a set of storage adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use ledger::domain::ports::UuidV7Generator;
    /// use ledger::inbound::http::state::{HttpState, HttpStatePorts};
    /// use ledger::outbound::memory::InMemoryLedger;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryLedger::new());
    /// let ports = HttpStatePorts::from_storage(
    ///     store.clone(),
    ///     store.clone(),
    ///     store.clone(),
    ///     store,
    ///     Arc::new(UuidV7Generator),
    ///     Arc::new(DefaultClock),
    /// );
    /// let state = HttpState::new(ports);
    /// assert_eq!(state.request_timeout().as_secs(), 10);
    /// ```
    pub fn from_storage<S, A, U, J>(
        store: Arc<S>,
        accounts: Arc<A>,
        users: Arc<U>,
        journal: Arc<J>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        S: LedgerStore + 'static,
        A: AccountRepository + 'static,
        U: UserRepository + 'static,
        J: JournalRepository + 'static,
    {
        let accounts_service = Arc::new(AccountsService::new(
            accounts.clone(),
            users.clone(),
            journal,
            ids.clone(),
            clock.clone(),
        ));
        let users_service = Arc::new(UsersService::new(users, accounts, ids.clone(), clock.clone()));
        Self {
            ledger: Arc::new(LedgerService::new(store, ids, clock)),
            accounts: accounts_service.clone(),
            accounts_query: accounts_service.clone(),
            journal: accounts_service,
            users: users_service.clone(),
            users_query: users_service,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub ledger: Arc<dyn LedgerCommand>,
    pub accounts: Arc<dyn AccountsCommand>,
    pub accounts_query: Arc<dyn AccountsQuery>,
    pub journal: Arc<dyn JournalQuery>,
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    request_timeout: Duration,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state with the default mutation deadline.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            ledger,
            accounts,
            accounts_query,
            journal,
            users,
            users_query,
        } = ports;
        Self {
            ledger,
            accounts,
            accounts_query,
            journal,
            users,
            users_query,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the deadline applied to balance mutations.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Deadline budget for a single mutation.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Absolute deadline for a mutation starting now.
    pub fn deadline(&self) -> Instant {
        Instant::now() + self.request_timeout
    }
}
