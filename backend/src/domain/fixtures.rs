//! Deterministic collaborators shared by service unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::ports::{AccountRepository, IdGenerator, UserRepository};
use super::{Account, AccountDraft, AccountId, DisplayName, User, UserId};
use crate::outbound::memory::InMemoryLedger;

pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).expect("valid fixture timestamp")
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_now(),
    })
}

/// Hands out increasing identifiers starting above every seeded fixture id.
#[derive(Default)]
pub(crate) struct SequentialIds {
    next: AtomicU64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> Uuid {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        Uuid::from_u128((1_u128 << 64) + u128::from(n))
    }
}

pub(crate) fn user_id(n: u128) -> UserId {
    UserId::from_uuid(Uuid::from_u128(n))
}

pub(crate) fn account_id(n: u128) -> AccountId {
    AccountId::from_uuid(Uuid::from_u128(n))
}

pub(crate) async fn seed_user(store: &InMemoryLedger, n: u128) -> User {
    let user = User::register(
        user_id(n),
        DisplayName::new(format!("user {n}")).expect("fixture name"),
        fixture_now(),
    );
    UserRepository::create(store, &user)
        .await
        .expect("seed user");
    user
}

pub(crate) async fn seed_account(
    store: &InMemoryLedger,
    owner: u128,
    n: u128,
    balance: Decimal,
) -> Account {
    let account = Account::restore(AccountDraft {
        id: account_id(n),
        user_id: user_id(owner),
        name: DisplayName::new(format!("account {n}")).expect("fixture name"),
        balance,
        created_at: fixture_now(),
        updated_at: fixture_now(),
        deleted_at: None,
    })
    .expect("non-negative fixture balance");
    AccountRepository::create(store, &account)
        .await
        .expect("seed account");
    account
}

pub(crate) async fn balance_of(store: &InMemoryLedger, n: u128) -> Option<Decimal> {
    AccountRepository::find_by_id(store, &account_id(n))
        .await
        .expect("read account")
        .map(|account| account.balance())
}
