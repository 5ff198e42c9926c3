//! Driving port for balance mutations.
//!
//! Every request carries the caller's deadline. The ledger abandons and rolls
//! back the unit of work once the deadline passes.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::time::Instant;

use crate::domain::{AccountId, Error, TransactionId};

/// Pay `amount` into an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositRequest {
    /// Account to credit.
    pub account_id: AccountId,
    /// Raw amount; must be strictly positive.
    pub amount: Decimal,
    /// Point after which the operation is abandoned.
    pub deadline: Instant,
}

/// Take `amount` out of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawRequest {
    /// Account to debit.
    pub account_id: AccountId,
    /// Raw amount; must be strictly positive.
    pub amount: Decimal,
    /// Point after which the operation is abandoned.
    pub deadline: Instant,
}

/// Move `amount` between two distinct accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    /// Account to debit.
    pub from_account_id: AccountId,
    /// Account to credit.
    pub to_account_id: AccountId,
    /// Raw amount; must be strictly positive.
    pub amount: Decimal,
    /// Point after which the operation is abandoned.
    pub deadline: Instant,
}

/// Domain use-case port for deposits, withdrawals and transfers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerCommand: Send + Sync {
    /// Credit an account; returns the journal entry id.
    async fn deposit(&self, request: DepositRequest) -> Result<TransactionId, Error>;

    /// Debit an account; returns the journal entry id.
    async fn withdraw(&self, request: WithdrawRequest) -> Result<TransactionId, Error>;

    /// Move funds atomically; returns the id of the debit entry.
    async fn transfer(&self, request: TransferRequest) -> Result<TransactionId, Error>;
}
