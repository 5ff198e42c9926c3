//! Driving port for transaction history.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{AccountId, Error, TransactionId, TransactionRecord};

/// A page of journal entries keyed by transaction id.
pub type TransactionPage = Page<TransactionRecord, TransactionId>;

/// Domain use-case port for paging through an account's journal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JournalQuery: Send + Sync {
    /// Entries for a non-deleted account, most recent first.
    async fn list_transactions(
        &self,
        account_id: &AccountId,
        page: PageRequest<TransactionId>,
    ) -> Result<TransactionPage, Error>;
}
