//! Port for reading the transaction journal.
//!
//! Entries are written only through
//! [`LedgerTransaction::append_transaction`](super::LedgerTransaction); this
//! port is read-only.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{AccountId, TransactionId, TransactionRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by journal repository adapters.
    pub enum JournalRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "journal repository connection failed: {message}",
        /// Query failed or a stored row could not be decoded.
        Query { message: String } =>
            "journal repository query failed: {message}",
    }
}

/// Port for paging through an account's journal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// Entries for `account_id` by descending id, strictly before the cursor
    /// when present, capped at `page.limit()`.
    async fn list_for_account(
        &self,
        account_id: &AccountId,
        page: &PageRequest<TransactionId>,
    ) -> Result<Vec<TransactionRecord>, JournalRepositoryError>;
}
