//! Tests for account opening and the account and journal read ports.

use std::time::Duration;

use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::time::Instant;

use super::*;
use crate::domain::fixtures::{
    SequentialIds, account_id, fixture_clock, fixture_now, seed_account, seed_user, user_id,
};
use crate::domain::ports::{
    DepositRequest, LedgerCommand, MockAccountRepository, MockJournalRepository,
    MockUserRepository,
};
use crate::domain::{ErrorCode, LedgerService};
use crate::outbound::memory::InMemoryLedger;

type MemoryAccounts = AccountsService<InMemoryLedger, InMemoryLedger, InMemoryLedger>;

fn service_over(store: &InMemoryLedger) -> MemoryAccounts {
    let shared = Arc::new(store.clone());
    AccountsService::new(
        Arc::clone(&shared),
        Arc::clone(&shared),
        shared,
        Arc::new(SequentialIds::default()),
        fixture_clock(),
    )
}

#[fixture]
async fn ledger() -> InMemoryLedger {
    let store = InMemoryLedger::new();
    seed_user(&store, 1).await;
    seed_user(&store, 2).await;
    store
}

#[rstest]
#[tokio::test]
async fn create_account_opens_with_zero_balance(#[future] ledger: InMemoryLedger) {
    let store = ledger.await;
    let service = service_over(&store);

    let account = service
        .create_account(CreateAccountRequest {
            user_id: user_id(1),
            name: " Savings ".to_owned(),
        })
        .await
        .expect("account opened");

    assert_eq!(account.balance(), Decimal::ZERO);
    assert_eq!(account.name().as_ref(), "Savings");
    assert_eq!(account.user_id(), user_id(1));
    assert_eq!(account.created_at(), fixture_now());
    assert!(account.deleted_at().is_none());

    let fetched = service.get_account(&account.id()).await.expect("readable");
    assert_eq!(fetched, account);
}

#[rstest]
#[tokio::test]
async fn create_account_for_unknown_user_is_not_found(#[future] ledger: InMemoryLedger) {
    let store = ledger.await;

    let err = service_over(&store)
        .create_account(CreateAccountRequest {
            user_id: user_id(404),
            name: "Savings".to_owned(),
        })
        .await
        .expect_err("unknown owner");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), format!("user_id {} not found", user_id(404)));
}

#[rstest]
#[tokio::test]
async fn blank_account_name_never_touches_storage() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().never();
    let mut accounts = MockAccountRepository::new();
    accounts.expect_create().never();
    let service = AccountsService::new(
        Arc::new(accounts),
        Arc::new(users),
        Arc::new(MockJournalRepository::new()),
        Arc::new(SequentialIds::default()),
        fixture_clock(),
    );

    let err = service
        .create_account(CreateAccountRequest {
            user_id: user_id(1),
            name: "  ".to_owned(),
        })
        .await
        .expect_err("blank name");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "missing name");
}

#[rstest]
#[tokio::test]
async fn unknown_account_is_not_found(#[future] ledger: InMemoryLedger) {
    let store = ledger.await;

    let err = service_over(&store)
        .get_account(&account_id(404))
        .await
        .expect_err("missing account");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), format!("account_id {} not found", account_id(404)));
}

#[rstest]
#[tokio::test]
async fn listing_filters_by_owner_and_pages(#[future] ledger: InMemoryLedger) {
    let store = ledger.await;
    for n in 10..13 {
        seed_account(&store, 1, n, Decimal::ZERO).await;
    }
    seed_account(&store, 2, 20, Decimal::ZERO).await;
    let service = service_over(&store);

    let first = service
        .list_accounts(Some(user_id(1)), PageRequest::new(None, Some(2)))
        .await
        .expect("first page");
    let ids: Vec<_> = first.items().iter().map(Account::id).collect();
    assert_eq!(ids, vec![account_id(12), account_id(11)]);
    let cursor = first.next_cursor().copied();
    assert_eq!(cursor, Some(account_id(11)));

    let rest = service
        .list_accounts(Some(user_id(1)), PageRequest::new(cursor, Some(2)))
        .await
        .expect("second page");
    let ids: Vec<_> = rest.items().iter().map(Account::id).collect();
    assert_eq!(ids, vec![account_id(10)]);
    assert!(rest.next_cursor().is_none());

    let everyone = service
        .list_accounts(None, PageRequest::first())
        .await
        .expect("all accounts");
    assert_eq!(everyone.items().len(), 4);
}

#[rstest]
#[tokio::test]
async fn journal_lists_newest_first(#[future] ledger: InMemoryLedger) {
    let store = ledger.await;
    seed_account(&store, 1, 10, Decimal::ZERO).await;
    let ledger_service = LedgerService::new(
        Arc::new(store.clone()),
        Arc::new(SequentialIds::default()),
        fixture_clock(),
    );
    let mut deposited = Vec::new();
    for amount in [dec!(1), dec!(2), dec!(3)] {
        let id = ledger_service
            .deposit(DepositRequest {
                account_id: account_id(10),
                amount,
                deadline: Instant::now() + Duration::from_secs(5),
            })
            .await
            .expect("deposit");
        deposited.push(id);
    }
    let service = service_over(&store);

    let page = service
        .list_transactions(&account_id(10), PageRequest::new(None, Some(2)))
        .await
        .expect("journal page");
    let ids: Vec<_> = page.items().iter().map(TransactionRecord::id).collect();
    assert_eq!(ids, vec![deposited[2], deposited[1]]);
    assert_eq!(page.items()[0].balance(), dec!(6));

    let tail = service
        .list_transactions(&account_id(10), PageRequest::new(page.next_cursor().copied(), Some(2)))
        .await
        .expect("journal tail");
    let ids: Vec<_> = tail.items().iter().map(TransactionRecord::id).collect();
    assert_eq!(ids, vec![deposited[0]]);
    assert!(tail.next_cursor().is_none());
}

#[rstest]
#[tokio::test]
async fn journal_of_unknown_account_is_not_found(#[future] ledger: InMemoryLedger) {
    let store = ledger.await;

    let err = service_over(&store)
        .list_transactions(&account_id(404), PageRequest::first())
        .await
        .expect_err("missing account");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn journal_repository_failure_is_internal() {
    let mut accounts = MockAccountRepository::new();
    accounts.expect_find_by_id().return_once(|id| {
        Ok(Some(Account::open(
            *id,
            user_id(1),
            DisplayName::new("a").expect("name"),
            fixture_now(),
        )))
    });
    let mut journal = MockJournalRepository::new();
    journal
        .expect_list_for_account()
        .return_once(|_, _| Err(JournalRepositoryError::query("relation missing")));
    let service = AccountsService::new(
        Arc::new(accounts),
        Arc::new(MockUserRepository::new()),
        Arc::new(journal),
        Arc::new(SequentialIds::default()),
        fixture_clock(),
    );

    let err = service
        .list_transactions(&account_id(10), PageRequest::first())
        .await
        .expect_err("journal down");

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert!(err.message().contains("relation missing"));
}
