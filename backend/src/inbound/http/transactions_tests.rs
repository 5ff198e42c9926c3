//! Tests for the mutation and journal handlers.

use super::*;
use crate::domain::fixtures::{account_id, balance_of, seed_account, seed_user};
use crate::domain::{Error, TransactionId};
use crate::inbound::http::test_utils::{MockPorts, detail_codes, in_memory_state, test_app};
use crate::outbound::memory::InMemoryLedger;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use uuid::Uuid;

#[fixture]
async fn funded() -> InMemoryLedger {
    let store = InMemoryLedger::new();
    seed_user(&store, 1).await;
    seed_account(&store, 1, 10, dec!(100)).await;
    seed_account(&store, 1, 11, dec!(0)).await;
    store
}

fn post(uri: String, body: Value) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri(&uri)
        .set_json(body)
        .to_request()
}

#[rstest]
#[case(json!({"amount": "25.50"}))]
#[case(json!({"amount": 25.5}))]
#[actix_web::test]
async fn deposit_accepts_strings_and_numbers(
    #[future] funded: InMemoryLedger,
    #[case] body: Value,
) {
    let store = funded.await;
    let app = actix_test::init_service(test_app(in_memory_state(&store))).await;

    let res = actix_test::call_service(
        &app,
        post(format!("/accounts/{}/deposit", account_id(10)), body),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let created: TransactionCreated = actix_test::read_body_json(res).await;
    assert!(created.transaction_id.parse::<Uuid>().is_ok());
    assert_eq!(balance_of(&store, 10).await, Some(dec!(125.5)));
}

#[rstest]
#[case(json!({}), "missing_field")]
#[case(json!({"amount": "0"}), "non_positive_amount")]
#[case(json!({"amount": "-3"}), "non_positive_amount")]
#[actix_web::test]
async fn deposit_rejects_bad_amounts(
    #[future] funded: InMemoryLedger,
    #[case] body: Value,
    #[case] code: &str,
) {
    let store = funded.await;
    let app = actix_test::init_service(test_app(in_memory_state(&store))).await;

    let res = actix_test::call_service(
        &app,
        post(format!("/accounts/{}/deposit", account_id(10)), body),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(detail_codes(&body), (Some("amount"), Some(code)));
    assert_eq!(balance_of(&store, 10).await, Some(dec!(100)));
}

#[rstest]
#[actix_web::test]
async fn withdraw_overdraft_is_insufficient_funds(#[future] funded: InMemoryLedger) {
    let store = funded.await;
    let app = actix_test::init_service(test_app(in_memory_state(&store))).await;

    let res = actix_test::call_service(
        &app,
        post(
            format!("/accounts/{}/withdraw", account_id(10)),
            json!({"amount": "100.01"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "insufficient_funds");
    assert_eq!(balance_of(&store, 10).await, Some(dec!(100)));
}

#[rstest]
#[actix_web::test]
async fn withdraw_unknown_account_is_not_found(#[future] funded: InMemoryLedger) {
    let store = funded.await;
    let app = actix_test::init_service(test_app(in_memory_state(&store))).await;

    let res = actix_test::call_service(
        &app,
        post(
            format!("/accounts/{}/withdraw", account_id(77)),
            json!({"amount": "1"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn transfer_moves_money_and_journals_both_sides(#[future] funded: InMemoryLedger) {
    let store = funded.await;
    let app = actix_test::init_service(test_app(in_memory_state(&store))).await;

    let created: TransactionCreated = actix_test::call_and_read_body_json(
        &app,
        post(
            format!("/accounts/{}/transfer", account_id(10)),
            json!({"to_account_id": account_id(11).to_string(), "amount": 30}),
        ),
    )
    .await;
    assert_eq!(balance_of(&store, 10).await, Some(dec!(70)));
    assert_eq!(balance_of(&store, 11).await, Some(dec!(30)));

    let source: TransactionListResponse = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/accounts/{}/transactions", account_id(10)))
            .to_request(),
    )
    .await;
    let debit = source.transactions.first().expect("debit entry");
    assert_eq!(debit.transaction_id, created.transaction_id);
    assert_eq!(debit.amount, dec!(-30));
    assert_eq!(debit.balance, dec!(70));
    assert_eq!(debit.kind, "transfer");
    assert_eq!(debit.status, "completed");
    assert_eq!(
        debit.metadata.to_account_id.as_deref(),
        Some(account_id(11).to_string().as_str())
    );

    let destination: TransactionListResponse = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/accounts/{}/transactions", account_id(11)))
            .to_request(),
    )
    .await;
    let credit = destination.transactions.first().expect("credit entry");
    assert_eq!(credit.amount, dec!(30));
    assert_eq!(
        credit.metadata.from_account_id.as_deref(),
        Some(account_id(10).to_string().as_str())
    );
}

#[rstest]
#[case(json!({"amount": "5"}), "to_account_id", "missing_field")]
#[case(json!({"to_account_id": "nope", "amount": "5"}), "to_account_id", "invalid_uuid")]
#[case(
    json!({"to_account_id": "00000000-0000-0000-0000-00000000000b"}),
    "amount",
    "missing_field"
)]
#[actix_web::test]
async fn transfer_validates_the_body(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state())).await;

    let res = actix_test::call_service(
        &app,
        post(format!("/accounts/{}/transfer", account_id(10)), body),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(detail_codes(&body), (Some(field), Some(code)));
}

#[rstest]
#[actix_web::test]
async fn transfer_to_self_is_invalid(#[future] funded: InMemoryLedger) {
    let store = funded.await;
    let app = actix_test::init_service(test_app(in_memory_state(&store))).await;

    let res = actix_test::call_service(
        &app,
        post(
            format!("/accounts/{}/transfer", account_id(10)),
            json!({"to_account_id": account_id(10).to_string(), "amount": "5"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn transfer_to_missing_destination_names_it(#[future] funded: InMemoryLedger) {
    let store = funded.await;
    let app = actix_test::init_service(test_app(in_memory_state(&store))).await;

    let res = actix_test::call_service(
        &app,
        post(
            format!("/accounts/{}/transfer", account_id(10)),
            json!({"to_account_id": account_id(99).to_string(), "amount": "5"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(res).await;
    let message = body["message"].as_str().expect("message");
    assert!(message.starts_with("destination account_id"), "{message}");
    assert_eq!(balance_of(&store, 10).await, Some(dec!(100)));
}

#[rstest]
#[actix_web::test]
async fn mutations_carry_a_deadline() {
    let mut ports = MockPorts::default();
    ports
        .ledger
        .expect_deposit()
        .withf(|request| request.deadline > tokio::time::Instant::now())
        .times(1)
        .return_once(|_| Ok(TransactionId::from_uuid(Uuid::nil())));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let created: TransactionCreated = actix_test::call_and_read_body_json(
        &app,
        post(
            format!("/accounts/{}/deposit", account_id(10)),
            json!({"amount": "1"}),
        ),
    )
    .await;
    assert_eq!(created.transaction_id, Uuid::nil().to_string());
}

#[rstest]
#[actix_web::test]
async fn ledger_failures_are_redacted() {
    let mut ports = MockPorts::default();
    ports
        .ledger
        .expect_withdraw()
        .times(1)
        .return_once(|_| Err(Error::internal("lock wait timed out")));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let res = actix_test::call_service(
        &app,
        post(
            format!("/accounts/{}/withdraw", account_id(10)),
            json!({"amount": "1"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Internal server error");
}

#[rstest]
#[actix_web::test]
async fn journal_pages_newest_first(#[future] funded: InMemoryLedger) {
    let store = funded.await;
    let app = actix_test::init_service(test_app(in_memory_state(&store))).await;
    for amount in ["1", "2", "3"] {
        let res = actix_test::call_service(
            &app,
            post(
                format!("/accounts/{}/deposit", account_id(11)),
                json!({ "amount": amount }),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let uri = format!("/accounts/{}/transactions?limit=2", account_id(11));
    let first: TransactionListResponse = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get().uri(&uri).to_request(),
    )
    .await;
    let amounts: Vec<_> = first.transactions.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![dec!(3), dec!(2)]);
    let cursor = first.next_cursor.expect("cursor");

    let second: TransactionListResponse = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("{uri}&cursor={cursor}"))
            .to_request(),
    )
    .await;
    let amounts: Vec<_> = second.transactions.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![dec!(1)]);
    assert_eq!(second.transactions[0].balance, dec!(1));
    assert!(second.next_cursor.is_none());
}

#[rstest]
#[actix_web::test]
async fn journal_of_unknown_account_is_not_found(#[future] funded: InMemoryLedger) {
    let store = funded.await;
    let app = actix_test::init_service(test_app(in_memory_state(&store))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/accounts/{}/transactions", account_id(55)))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
