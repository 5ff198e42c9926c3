//! Port for atomic balance mutations.
//!
//! A [`LedgerStore`] runs a unit of work inside one storage transaction. The
//! work receives a [`LedgerTransaction`] handle and must perform every read and
//! write through it. The store commits when the work returns `Ok` and rolls
//! back when it returns `Err`, when it panics, or when its future is dropped
//! before completion.

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::domain::{Account, AccountId, Error, TransactionRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger store adapters.
    pub enum LedgerStoreError {
        /// Storage connection could not be established.
        Connection { message: String } =>
            "ledger store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "ledger store query failed: {message}",
        /// A row lock could not be acquired within the configured timeout.
        LockTimeout { message: String } =>
            "ledger store lock wait timed out: {message}",
    }
}

impl From<LedgerStoreError> for Error {
    fn from(error: LedgerStoreError) -> Self {
        Error::internal(error.to_string())
    }
}

/// Future returned by a unit of work borrowing the transaction for `'t`.
pub type UnitOfWork<'t, T, E> = BoxFuture<'t, Result<T, E>>;

/// Operations available inside an open unit of work.
#[async_trait]
pub trait LedgerTransaction: Send {
    /// Lock and load a non-deleted account.
    ///
    /// The lock is held until the unit of work ends. Loading an account that
    /// this transaction already holds returns its current staged state.
    async fn get_account_for_update(
        &mut self,
        id: &AccountId,
    ) -> Result<Option<Account>, LedgerStoreError>;

    /// Persist the state of an account locked by this transaction.
    async fn update_account(&mut self, account: &Account) -> Result<(), LedgerStoreError>;

    /// Append an immutable journal entry.
    async fn append_transaction(
        &mut self,
        record: &TransactionRecord,
    ) -> Result<(), LedgerStoreError>;
}

/// Storage capable of running scoped units of work.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Run `work` atomically.
    ///
    /// Failures to begin or commit the transaction surface through
    /// `E: From<LedgerStoreError>`.
    async fn in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<LedgerStoreError> + Send + 'static,
        F: for<'t> FnOnce(&'t mut dyn LedgerTransaction) -> UnitOfWork<'t, T, E> + Send + 'static;
}
