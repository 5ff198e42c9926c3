//! In-process storage adapter.
//!
//! [`InMemoryLedger`] implements every driven storage port against shared
//! ordered maps. It backs the service when no database host is configured
//! and gives tests a real transactional store without Postgres.
//!
//! Units of work hold one async mutex per locked account for their whole
//! lifetime and stage writes locally. Staged writes are applied under a
//! single table write lock on commit and simply dropped otherwise, so a
//! failed, cancelled or panicking unit of work leaves no trace.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pagination::PageRequest;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, JournalRepository, JournalRepositoryError,
    LedgerStore, LedgerStoreError, LedgerTransaction, UnitOfWork, UserRepository,
    UserRepositoryError,
};
use crate::domain::{Account, AccountId, TransactionId, TransactionRecord, User, UserId};

/// Lock wait applied when none is configured.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    accounts: BTreeMap<AccountId, Account>,
    transactions: BTreeMap<TransactionId, TransactionRecord>,
}

struct Shared {
    tables: RwLock<Tables>,
    row_locks: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
    lock_timeout: Duration,
}

/// Shared in-process ledger storage. Clones share state.
#[derive(Clone)]
pub struct InMemoryLedger {
    shared: Arc<Shared>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    /// Create an empty store using [`DEFAULT_LOCK_TIMEOUT`].
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    /// Create an empty store that gives up waiting for a row lock after
    /// `lock_timeout`.
    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                tables: RwLock::new(Tables::default()),
                row_locks: Mutex::new(HashMap::new()),
                lock_timeout,
            }),
        }
    }
}

/// Upper bound for a descending keyset scan.
fn before<C: Copy>(page: &PageRequest<C>) -> (Bound<C>, Bound<C>) {
    let upper = page.cursor().map_or(Bound::Unbounded, |cursor| Bound::Excluded(*cursor));
    (Bound::Unbounded, upper)
}

struct InMemoryTransaction<'s> {
    shared: &'s Shared,
    held: HashMap<AccountId, OwnedMutexGuard<()>>,
    staged_accounts: HashMap<AccountId, Account>,
    staged_records: Vec<TransactionRecord>,
}

impl<'s> InMemoryTransaction<'s> {
    fn new(shared: &'s Shared) -> Self {
        Self {
            shared,
            held: HashMap::new(),
            staged_accounts: HashMap::new(),
            staged_records: Vec::new(),
        }
    }

    async fn committed_account(&self, id: &AccountId) -> Option<Account> {
        let tables = self.shared.tables.read().await;
        tables
            .accounts
            .get(id)
            .filter(|account| !account.is_deleted())
            .cloned()
    }

    async fn acquire(&mut self, id: &AccountId) -> Result<(), LedgerStoreError> {
        let row_lock = {
            let mut locks = self.shared.row_locks.lock().await;
            Arc::clone(locks.entry(*id).or_default())
        };
        let timeout = self.shared.lock_timeout;
        let guard = tokio::time::timeout(timeout, row_lock.lock_owned())
            .await
            .map_err(|_| {
                LedgerStoreError::lock_timeout(format!(
                    "account {id} still locked after {}ms",
                    timeout.as_millis()
                ))
            })?;
        self.held.insert(*id, guard);
        Ok(())
    }

    async fn commit(self) {
        let Self {
            shared,
            held,
            staged_accounts,
            staged_records,
        } = self;
        let mut tables = shared.tables.write().await;
        for (id, account) in staged_accounts {
            tables.accounts.insert(id, account);
        }
        for record in staged_records {
            tables.transactions.insert(record.id(), record);
        }
        drop(tables);
        drop(held);
    }
}

#[async_trait]
impl<'s> LedgerTransaction for InMemoryTransaction<'s> {
    async fn get_account_for_update(
        &mut self,
        id: &AccountId,
    ) -> Result<Option<Account>, LedgerStoreError> {
        if let Some(staged) = self.staged_accounts.get(id) {
            return Ok(Some(staged.clone()));
        }
        if !self.held.contains_key(id) {
            if self.committed_account(id).await.is_none() {
                return Ok(None);
            }
            self.acquire(id).await?;
        }
        // Re-read after locking: the row may have changed while we waited.
        Ok(self.committed_account(id).await)
    }

    async fn update_account(&mut self, account: &Account) -> Result<(), LedgerStoreError> {
        let id = account.id();
        if !self.held.contains_key(&id) {
            return Err(LedgerStoreError::query(format!(
                "account {id} updated without holding its lock"
            )));
        }
        self.staged_accounts.insert(id, account.clone());
        Ok(())
    }

    async fn append_transaction(
        &mut self,
        record: &TransactionRecord,
    ) -> Result<(), LedgerStoreError> {
        let id = record.id();
        let staged_twice = self.staged_records.iter().any(|staged| staged.id() == id);
        if staged_twice || self.shared.tables.read().await.transactions.contains_key(&id) {
            return Err(LedgerStoreError::query(format!(
                "duplicate transaction id {id}"
            )));
        }
        self.staged_records.push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<LedgerStoreError> + Send + 'static,
        F: for<'t> FnOnce(&'t mut dyn LedgerTransaction) -> UnitOfWork<'t, T, E> + Send + 'static,
    {
        let mut tx = InMemoryTransaction::new(&self.shared);
        let outcome = work(&mut tx).await;
        match outcome {
            Ok(value) => {
                tx.commit().await;
                Ok(value)
            }
            Err(err) => {
                debug!("in-memory unit of work rolled back");
                Err(err)
            }
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryLedger {
    async fn create(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut tables = self.shared.tables.write().await;
        if tables.users.contains_key(&user.id()) {
            return Err(UserRepositoryError::query(format!(
                "duplicate user id {}",
                user.id()
            )));
        }
        tables.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.shared.tables.read().await.users.get(id).cloned())
    }

    async fn list(&self, page: &PageRequest<UserId>) -> Result<Vec<User>, UserRepositoryError> {
        let tables = self.shared.tables.read().await;
        Ok(tables
            .users
            .range(before(page))
            .rev()
            .take(page.limit())
            .map(|(_, user)| user.clone())
            .collect())
    }
}

#[async_trait]
impl AccountRepository for InMemoryLedger {
    async fn create(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut tables = self.shared.tables.write().await;
        if !tables.users.contains_key(&account.user_id()) {
            return Err(AccountRepositoryError::query(format!(
                "owner {} does not exist",
                account.user_id()
            )));
        }
        if tables.accounts.contains_key(&account.id()) {
            return Err(AccountRepositoryError::query(format!(
                "duplicate account id {}",
                account.id()
            )));
        }
        tables.accounts.insert(account.id(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let tables = self.shared.tables.read().await;
        Ok(tables
            .accounts
            .get(id)
            .filter(|account| !account.is_deleted())
            .cloned())
    }

    async fn list(
        &self,
        user_id: Option<UserId>,
        page: &PageRequest<AccountId>,
    ) -> Result<Vec<Account>, AccountRepositoryError> {
        let tables = self.shared.tables.read().await;
        Ok(tables
            .accounts
            .range(before(page))
            .rev()
            .map(|(_, account)| account)
            .filter(|account| !account.is_deleted())
            .filter(|account| user_id.is_none_or(|owner| account.user_id() == owner))
            .take(page.limit())
            .cloned()
            .collect())
    }

    async fn list_ids_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AccountId>, AccountRepositoryError> {
        let tables = self.shared.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .rev()
            .filter(|account| !account.is_deleted() && account.user_id() == *user_id)
            .map(Account::id)
            .collect())
    }
}

#[async_trait]
impl JournalRepository for InMemoryLedger {
    async fn list_for_account(
        &self,
        account_id: &AccountId,
        page: &PageRequest<TransactionId>,
    ) -> Result<Vec<TransactionRecord>, JournalRepositoryError> {
        let tables = self.shared.tables.read().await;
        Ok(tables
            .transactions
            .range(before(page))
            .rev()
            .map(|(_, record)| record)
            .filter(|record| record.account_id() == *account_id)
            .take(page.limit())
            .cloned()
            .collect())
    }
}
