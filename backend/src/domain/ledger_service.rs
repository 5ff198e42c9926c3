//! Balance-mutation core: deposits, withdrawals and transfers.
//!
//! Each operation validates its amount before touching storage, then runs a
//! single unit of work that locks the affected account rows, checks the
//! balance, writes the new balances and appends journal entries. Any failure
//! inside the unit of work rolls all of it back.
//!
//! Transfers lock both rows in ascending account-id order so two transfers
//! moving money in opposite directions between the same pair cannot deadlock.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use mockable::Clock;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::domain::ports::{
    DepositRequest, IdGenerator, LedgerCommand, LedgerStore, LedgerTransaction, TransferRequest,
    WithdrawRequest,
};
use crate::domain::{
    Account, AccountId, Amount, BalanceError, Error, TransactionId, TransactionKind,
    TransactionMetadata, TransactionRecord,
};

fn validate_amount(raw: Decimal) -> Result<Amount, Error> {
    Amount::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "amount",
            "code": err.code(),
            "value": raw.to_string(),
        }))
    })
}

fn account_not_found(id: &AccountId) -> Error {
    Error::not_found(format!("account_id {id} not found"))
}

fn destination_not_found(id: &AccountId) -> Error {
    Error::not_found(format!("destination account_id {id} not found"))
}

fn map_balance_error(error: BalanceError, account_id: &AccountId) -> Error {
    match error {
        BalanceError::InsufficientFunds { .. } => Error::insufficient_funds(error.to_string())
            .with_details(json!({ "account_id": account_id.to_string() })),
        BalanceError::Overflow => Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "amount", "code": "balance_overflow" })),
    }
}

/// Await `work` until `deadline`; an elapsed deadline drops the unit of work,
/// which rolls it back.
async fn before_deadline<T>(
    deadline: Instant,
    operation: &'static str,
    work: impl Future<Output = Result<T, Error>>,
) -> Result<T, Error> {
    match tokio::time::timeout_at(deadline, work).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, "ledger operation abandoned at deadline");
            Err(Error::internal(format!("{operation} exceeded its deadline")))
        }
    }
}

async fn lock_account(
    tx: &mut dyn LedgerTransaction,
    id: &AccountId,
) -> Result<Option<Account>, Error> {
    Ok(tx.get_account_for_update(id).await?)
}

/// Id and time source for journal entries. Only consulted once the rows are
/// locked, so ids on an account ascend in commit order.
struct Stamper {
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl Stamper {
    fn entry_id(&self) -> TransactionId {
        TransactionId::from_uuid(self.ids.next_id())
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

struct SingleEntry {
    account_id: AccountId,
    amount: Amount,
    stamper: Stamper,
}

async fn deposit_in(tx: &mut dyn LedgerTransaction, entry: SingleEntry) -> Result<TransactionId, Error> {
    let SingleEntry {
        account_id,
        amount,
        stamper,
    } = entry;
    let mut account = lock_account(tx, &account_id)
        .await?
        .ok_or_else(|| account_not_found(&account_id))?;
    let now = stamper.now();
    account
        .credit(amount, now)
        .map_err(|err| map_balance_error(err, &account_id))?;
    tx.update_account(&account).await?;

    let record = TransactionRecord::completed(
        stamper.entry_id(),
        &account,
        amount.value(),
        TransactionKind::Deposit,
        TransactionMetadata::default(),
        now,
    );
    tx.append_transaction(&record).await?;
    Ok(record.id())
}

async fn withdraw_in(tx: &mut dyn LedgerTransaction, entry: SingleEntry) -> Result<TransactionId, Error> {
    let SingleEntry {
        account_id,
        amount,
        stamper,
    } = entry;
    let mut account = lock_account(tx, &account_id)
        .await?
        .ok_or_else(|| account_not_found(&account_id))?;
    let now = stamper.now();
    account
        .debit(amount, now)
        .map_err(|err| map_balance_error(err, &account_id))?;
    tx.update_account(&account).await?;

    let record = TransactionRecord::completed(
        stamper.entry_id(),
        &account,
        amount.negated(),
        TransactionKind::Withdrawal,
        TransactionMetadata::default(),
        now,
    );
    tx.append_transaction(&record).await?;
    Ok(record.id())
}

struct TransferEntries {
    from: AccountId,
    to: AccountId,
    amount: Amount,
    stamper: Stamper,
}

async fn transfer_in(
    tx: &mut dyn LedgerTransaction,
    entries: TransferEntries,
) -> Result<TransactionId, Error> {
    let TransferEntries {
        from,
        to,
        amount,
        stamper,
    } = entries;

    let (first, second) = if from < to { (from, to) } else { (to, from) };
    let first_account = lock_account(tx, &first).await?;
    let second_account = lock_account(tx, &second).await?;
    let (source, destination) = if first == from {
        (first_account, second_account)
    } else {
        (second_account, first_account)
    };
    let mut source = source.ok_or_else(|| account_not_found(&from))?;
    let mut destination = destination.ok_or_else(|| destination_not_found(&to))?;
    let now = stamper.now();

    source
        .debit(amount, now)
        .map_err(|err| map_balance_error(err, &from))?;
    destination
        .credit(amount, now)
        .map_err(|err| map_balance_error(err, &to))?;
    tx.update_account(&source).await?;
    tx.update_account(&destination).await?;

    let metadata = TransactionMetadata::transfer(from, to);
    let debit = TransactionRecord::completed(
        stamper.entry_id(),
        &source,
        amount.negated(),
        TransactionKind::Transfer,
        metadata,
        now,
    );
    let credit = TransactionRecord::completed(
        stamper.entry_id(),
        &destination,
        amount.value(),
        TransactionKind::Transfer,
        metadata,
        now,
    );
    tx.append_transaction(&debit).await?;
    tx.append_transaction(&credit).await?;
    Ok(debit.id())
}

/// Ledger service implementing the balance-mutation driving port.
pub struct LedgerService<S> {
    store: Arc<S>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl<S> Clone for LedgerService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ids: Arc::clone(&self.ids),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S> LedgerService<S> {
    /// Create a ledger service over `store`.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use ledger::domain::LedgerService;
    /// # use ledger::domain::ports::UuidV7Generator;
    /// # use ledger::outbound::memory::InMemoryLedger;
    /// # use mockable::DefaultClock;
    /// let service = LedgerService::new(
    ///     Arc::new(InMemoryLedger::new()),
    ///     Arc::new(UuidV7Generator),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(store: Arc<S>, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { store, ids, clock }
    }

    fn stamper(&self) -> Stamper {
        Stamper {
            ids: Arc::clone(&self.ids),
            clock: Arc::clone(&self.clock),
        }
    }
}

#[async_trait]
impl<S> LedgerCommand for LedgerService<S>
where
    S: LedgerStore,
{
    async fn deposit(&self, request: DepositRequest) -> Result<TransactionId, Error> {
        let DepositRequest {
            account_id,
            amount,
            deadline,
        } = request;
        let amount = validate_amount(amount)?;
        let entry = SingleEntry {
            account_id,
            amount,
            stamper: self.stamper(),
        };

        let work = self
            .store
            .in_transaction(move |tx| deposit_in(tx, entry).boxed());
        let transaction_id = before_deadline(deadline, "deposit", work).await?;
        info!(%account_id, %transaction_id, %amount, "deposit committed");
        Ok(transaction_id)
    }

    async fn withdraw(&self, request: WithdrawRequest) -> Result<TransactionId, Error> {
        let WithdrawRequest {
            account_id,
            amount,
            deadline,
        } = request;
        let amount = validate_amount(amount)?;
        let entry = SingleEntry {
            account_id,
            amount,
            stamper: self.stamper(),
        };

        let work = self
            .store
            .in_transaction(move |tx| withdraw_in(tx, entry).boxed());
        let transaction_id = before_deadline(deadline, "withdraw", work).await?;
        info!(%account_id, %transaction_id, %amount, "withdrawal committed");
        Ok(transaction_id)
    }

    async fn transfer(&self, request: TransferRequest) -> Result<TransactionId, Error> {
        let TransferRequest {
            from_account_id,
            to_account_id,
            amount,
            deadline,
        } = request;
        let amount = validate_amount(amount)?;
        if from_account_id == to_account_id {
            return Err(
                Error::invalid_request("cannot transfer to the same account").with_details(
                    json!({
                        "field": "to_account_id",
                        "code": "self_transfer",
                        "value": to_account_id.to_string(),
                    }),
                ),
            );
        }
        let entries = TransferEntries {
            from: from_account_id,
            to: to_account_id,
            amount,
            stamper: self.stamper(),
        };

        let work = self
            .store
            .in_transaction(move |tx| transfer_in(tx, entries).boxed());
        let transaction_id = before_deadline(deadline, "transfer", work).await?;
        info!(
            from = %from_account_id,
            to = %to_account_id,
            %transaction_id,
            %amount,
            "transfer committed"
        );
        Ok(transaction_id)
    }
}

#[cfg(test)]
#[path = "ledger_service_tests.rs"]
mod tests;
