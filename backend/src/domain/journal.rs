//! Immutable journal entries recording every balance change.
//!
//! Kinds and statuses are closed enumerations. They persist as short fixed
//! codes and parsing an unknown code fails instead of guessing.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Account, AccountId, TransactionId, UserId};

/// Raised when a stored code does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code '{code}'")]
pub struct UnknownCodeError {
    kind: &'static str,
    code: String,
}

/// What caused a balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money paid into an account.
    Deposit,
    /// Money taken out of an account.
    Withdrawal,
    /// One side of a movement between two accounts.
    Transfer,
}

impl TransactionKind {
    /// Storage code.
    #[must_use]
    pub const fn as_code(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Transfer => "transfer",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = UnknownCodeError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            "transfer" => Ok(Self::Transfer),
            other => Err(UnknownCodeError {
                kind: "transaction kind",
                code: other.to_owned(),
            }),
        }
    }
}

/// Lifecycle state of a journal entry. Only completed entries are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// The balance change has been committed.
    Completed,
}

impl TransactionStatus {
    /// Storage code.
    #[must_use]
    pub const fn as_code(self) -> &'static str {
        match self {
            Self::Completed => "completed",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = UnknownCodeError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "completed" => Ok(Self::Completed),
            other => Err(UnknownCodeError {
                kind: "transaction status",
                code: other.to_owned(),
            }),
        }
    }
}

/// Links the two entries written by a transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMetadata {
    /// Account debited by the transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_account_id: Option<AccountId>,
    /// Account credited by the transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<AccountId>,
}

impl TransactionMetadata {
    /// Metadata shared by both sides of a transfer.
    #[must_use]
    pub const fn transfer(from: AccountId, to: AccountId) -> Self {
        Self {
            from_account_id: Some(from),
            to_account_id: Some(to),
        }
    }
}

/// Fields of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    /// Entry identifier.
    pub id: TransactionId,
    /// Account whose balance changed.
    pub account_id: AccountId,
    /// Owner of that account.
    pub user_id: UserId,
    /// Signed change: positive credits, negative debits.
    pub amount: Decimal,
    /// Balance after the change.
    pub balance: Decimal,
    /// Cause of the change.
    pub kind: TransactionKind,
    /// Entry status.
    pub status: TransactionStatus,
    /// Counterparty links.
    pub metadata: TransactionMetadata,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time, equal to creation for immutable entries.
    pub updated_at: DateTime<Utc>,
}

/// One immutable journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    draft: TransactionDraft,
}

impl TransactionRecord {
    /// Record a completed change on `account`, whose balance already reflects
    /// `amount`.
    #[must_use]
    pub fn completed(
        id: TransactionId,
        account: &Account,
        amount: Decimal,
        kind: TransactionKind,
        metadata: TransactionMetadata,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            draft: TransactionDraft {
                id,
                account_id: account.id(),
                user_id: account.user_id(),
                amount,
                balance: account.balance(),
                kind,
                status: TransactionStatus::Completed,
                metadata,
                created_at: now,
                updated_at: now,
            },
        }
    }

    /// Rebuild an entry from persisted state.
    #[must_use]
    pub const fn restore(draft: TransactionDraft) -> Self {
        Self { draft }
    }

    /// Entry identifier.
    #[must_use]
    pub const fn id(&self) -> TransactionId {
        self.draft.id
    }

    /// Account whose balance changed.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        self.draft.account_id
    }

    /// Owner of the account.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.draft.user_id
    }

    /// Signed amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.draft.amount
    }

    /// Balance snapshot after the change.
    #[must_use]
    pub const fn balance(&self) -> Decimal {
        self.draft.balance
    }

    /// Cause of the change.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        self.draft.kind
    }

    /// Entry status.
    #[must_use]
    pub const fn status(&self) -> TransactionStatus {
        self.draft.status
    }

    /// Counterparty links.
    #[must_use]
    pub const fn metadata(&self) -> &TransactionMetadata {
        &self.draft.metadata
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.draft.created_at
    }

    /// Last update time.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.draft.updated_at
    }
}
