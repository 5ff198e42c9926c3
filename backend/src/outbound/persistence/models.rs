//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types go through
//! the validating constructors so corrupt rows surface as query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    Account, AccountDraft, AccountId, DisplayName, TransactionDraft, TransactionId,
    TransactionMetadata, TransactionRecord, User, UserId,
};

use super::schema::{accounts, transactions, users};

/// Why a stored row could not become a domain value.
#[derive(Debug, thiserror::Error)]
#[error("corrupt {table} row {id}: {reason}")]
pub(crate) struct RowDecodeError {
    table: &'static str,
    id: Uuid,
    reason: String,
}

impl RowDecodeError {
    fn new(table: &'static str, id: Uuid, reason: impl ToString) -> Self {
        Self {
            table,
            id,
            reason: reason.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RowDecodeError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let name = DisplayName::new(&row.name)
            .map_err(|err| RowDecodeError::new("users", row.id, err))?;
        Ok(Self::restore(
            UserId::from_uuid(row.id),
            name,
            row.created_at,
            row.updated_at,
        ))
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            name: user.name().as_ref(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RowDecodeError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let name = DisplayName::new(&row.name)
            .map_err(|err| RowDecodeError::new("accounts", row.id, err))?;
        Self::restore(AccountDraft {
            id: AccountId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            name,
            balance: row.balance,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
        .map_err(|err| RowDecodeError::new("accounts", row.id, err))
    }
}

/// Insertable struct for opening accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Account> for NewAccountRow<'a> {
    fn from(account: &'a Account) -> Self {
        Self {
            id: *account.id().as_uuid(),
            user_id: *account.user_id().as_uuid(),
            name: account.name().as_ref(),
            balance: account.balance(),
            created_at: account.created_at(),
            updated_at: account.updated_at(),
        }
    }
}

/// Changeset applied when a unit of work persists a locked account.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = accounts)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AccountUpdate {
    pub balance: Decimal,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&Account> for AccountUpdate {
    fn from(account: &Account) -> Self {
        Self {
            balance: account.balance(),
            updated_at: account.updated_at(),
            deleted_at: account.deleted_at(),
        }
    }
}

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

/// Row struct for reading from the transactions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TransactionRow {
    pub id: Uuid,
    pub account_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub balance: Decimal,
    pub kind: String,
    pub status: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for TransactionRecord {
    type Error = RowDecodeError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| RowDecodeError::new("transactions", row.id, reason);
        let kind = row.kind.parse().map_err(|err: crate::domain::UnknownCodeError| {
            corrupt(err.to_string())
        })?;
        let status = row.status.parse().map_err(|err: crate::domain::UnknownCodeError| {
            corrupt(err.to_string())
        })?;
        let metadata: TransactionMetadata = serde_json::from_value(row.metadata)
            .map_err(|err| corrupt(format!("metadata: {err}")))?;
        Ok(Self::restore(TransactionDraft {
            id: TransactionId::from_uuid(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            user_id: UserId::from_uuid(row.user_id),
            amount: row.amount,
            balance: row.balance,
            kind,
            status,
            metadata,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

/// Insertable struct for journal entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transactions)]
pub(crate) struct NewTransactionRow {
    pub id: Uuid,
    pub account_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub balance: Decimal,
    pub kind: &'static str,
    pub status: &'static str,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&TransactionRecord> for NewTransactionRow {
    type Error = serde_json::Error;

    fn try_from(record: &TransactionRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: *record.id().as_uuid(),
            account_id: *record.account_id().as_uuid(),
            user_id: *record.user_id().as_uuid(),
            amount: record.amount(),
            balance: record.balance(),
            kind: record.kind().as_code(),
            status: record.status().as_code(),
            metadata: serde_json::to_value(record.metadata())?,
            created_at: record.created_at(),
            updated_at: record.updated_at(),
        })
    }
}
