//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`LedgerStore`], [`IdGenerator`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod accounts_command;
mod accounts_query;
mod id_generator;
mod journal_query;
mod journal_repository;
mod ledger_command;
mod ledger_store;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
pub use accounts_command::{AccountsCommand, CreateAccountRequest};
#[cfg(test)]
pub use accounts_query::MockAccountsQuery;
pub use accounts_query::{AccountPage, AccountsQuery};
#[cfg(test)]
pub use id_generator::MockIdGenerator;
pub use id_generator::{IdGenerator, UuidV7Generator};
#[cfg(test)]
pub use journal_query::MockJournalQuery;
pub use journal_query::{JournalQuery, TransactionPage};
#[cfg(test)]
pub use journal_repository::MockJournalRepository;
pub use journal_repository::{JournalRepository, JournalRepositoryError};
#[cfg(test)]
pub use ledger_command::MockLedgerCommand;
pub use ledger_command::{DepositRequest, LedgerCommand, TransferRequest, WithdrawRequest};
pub use ledger_store::{LedgerStore, LedgerStoreError, LedgerTransaction, UnitOfWork};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{UserPage, UsersQuery};
