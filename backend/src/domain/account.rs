//! Account entity and balance arithmetic.
//!
//! An [`Account`] only changes balance through [`Account::credit`] and
//! [`Account::debit`], which keep the balance non-negative.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{AMOUNT_MAX, AccountId, Amount, DisplayName, UserId};

/// Failures raised by balance arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BalanceError {
    /// The debit would leave the balance below zero.
    #[error("insufficient balance")]
    InsufficientFunds {
        /// Balance before the attempted debit.
        balance: Decimal,
        /// Amount requested.
        requested: Decimal,
    },
    /// The credit does not fit the decimal range.
    #[error("balance overflow")]
    Overflow,
}

/// Validation failures when restoring a persisted account.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// The stored balance is negative.
    #[error("account {id} has negative balance {balance}")]
    NegativeBalance {
        /// Offending account.
        id: AccountId,
        /// Stored balance.
        balance: Decimal,
    },
}

/// Input for [`Account::restore`].
#[derive(Debug, Clone)]
pub struct AccountDraft {
    /// Account identifier.
    pub id: AccountId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: DisplayName,
    /// Current balance.
    pub balance: Decimal,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A user-owned account holding a non-negative balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    user_id: UserId,
    name: DisplayName,
    balance: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Open a new account with a zero balance.
    #[must_use]
    pub fn open(id: AccountId, user_id: UserId, name: DisplayName, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            name,
            balance: Decimal::ZERO,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Rebuild an account from persisted state.
    ///
    /// # Errors
    ///
    /// Returns [`AccountValidationError::NegativeBalance`] when the stored
    /// balance is below zero.
    pub fn restore(draft: AccountDraft) -> Result<Self, AccountValidationError> {
        let AccountDraft {
            id,
            user_id,
            name,
            balance,
            created_at,
            updated_at,
            deleted_at,
        } = draft;
        if balance < Decimal::ZERO {
            return Err(AccountValidationError::NegativeBalance { id, balance });
        }
        Ok(Self {
            id,
            user_id,
            name,
            balance,
            created_at,
            updated_at,
            deleted_at,
        })
    }

    /// Account identifier.
    #[must_use]
    pub const fn id(&self) -> AccountId {
        self.id
    }

    /// Owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Current balance.
    #[must_use]
    pub const fn balance(&self) -> Decimal {
        self.balance
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

    /// Soft-delete marker.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Whether the account has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Mark the account as deleted without removing it.
    ///
    /// No ledger operation exposes account deletion yet.
    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    /// Add `amount` to the balance and return the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::Overflow`] if the sum exceeds [`AMOUNT_MAX`];
    /// the balance is left unchanged.
    pub fn credit(&mut self, amount: Amount, now: DateTime<Utc>) -> Result<Decimal, BalanceError> {
        let next = self
            .balance
            .checked_add(amount.value())
            .filter(|sum| *sum <= AMOUNT_MAX)
            .ok_or(BalanceError::Overflow)?;
        self.balance = next;
        self.updated_at = now;
        Ok(next)
    }

    /// Subtract `amount` from the balance and return the new balance.
    ///
    /// A debit that empties the account exactly is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::InsufficientFunds`] when the result would be
    /// negative; the balance is left unchanged.
    pub fn debit(&mut self, amount: Amount, now: DateTime<Utc>) -> Result<Decimal, BalanceError> {
        let next = self.balance - amount.value();
        if next < Decimal::ZERO {
            return Err(BalanceError::InsufficientFunds {
                balance: self.balance,
                requested: amount.value(),
            });
        }
        self.balance = next;
        self.updated_at = now;
        Ok(next)
    }
}
