//! Tests for the users handlers.

use super::*;
use crate::domain::fixtures::{fixture_now, seed_account, seed_user, user_id};
use crate::domain::{Error, User};
use crate::inbound::http::test_utils::{MockPorts, detail_codes, in_memory_state, test_app};
use crate::outbound::memory::InMemoryLedger;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use rust_decimal::Decimal;
use serde_json::{Value, json};

#[rstest]
#[actix_web::test]
async fn create_user_returns_the_stored_user() {
    let store = InMemoryLedger::new();
    let app = actix_test::init_service(test_app(in_memory_state(&store))).await;

    let req = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(json!({"name": "  Ada Lovelace "}))
        .to_request();
    let body: UserResponse = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.name, "Ada Lovelace");
    assert!(body.account_ids.is_none());
    let get = actix_test::TestRequest::get()
        .uri(&format!("/users/{}", body.user_id))
        .to_request();
    let fetched: UserResponse = actix_test::call_and_read_body_json(&app, get).await;
    assert_eq!(fetched.user_id, body.user_id);
    assert_eq!(fetched.account_ids, Some(Vec::new()));
}

#[rstest]
#[case(json!({}), "missing_field")]
#[case(json!({"name": "   "}), "missing_field")]
#[actix_web::test]
async fn create_user_rejects_missing_or_blank_names(#[case] payload: Value, #[case] code: &str) {
    let store = InMemoryLedger::new();
    let app = actix_test::init_service(test_app(in_memory_state(&store))).await;

    let req = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(payload)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(detail_codes(&body), (Some("name"), Some(code)));
}

#[rstest]
#[actix_web::test]
async fn get_user_lists_account_ids() {
    let store = InMemoryLedger::new();
    seed_user(&store, 1).await;
    let account = seed_account(&store, 1, 10, Decimal::ZERO).await;
    let app = actix_test::init_service(test_app(in_memory_state(&store))).await;

    let req = actix_test::TestRequest::get()
        .uri(&format!("/users/{}", user_id(1)))
        .to_request();
    let body: UserResponse = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.account_ids, Some(vec![account.id().to_string()]));
}

#[rstest]
#[case("/users/not-a-uuid", StatusCode::BAD_REQUEST, "invalid_request")]
#[case(
    "/users/00000000-0000-0000-0000-00000000abcd",
    StatusCode::NOT_FOUND,
    "not_found"
)]
#[actix_web::test]
async fn get_user_failures(
    #[case] uri: &str,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let store = InMemoryLedger::new();
    let app = actix_test::init_service(test_app(in_memory_state(&store))).await;

    let res =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), status);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], code);
}

#[rstest]
#[actix_web::test]
async fn list_users_walks_pages_without_overlap() {
    let store = InMemoryLedger::new();
    for n in 1..=5 {
        seed_user(&store, n).await;
    }
    let app = actix_test::init_service(test_app(in_memory_state(&store))).await;

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let uri = match &cursor {
            Some(cursor) => format!("/users?limit=2&cursor={cursor}"),
            None => "/users?limit=2".to_owned(),
        };
        let page: UserListResponse = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get().uri(&uri).to_request(),
        )
        .await;
        seen.extend(page.users.into_iter().map(|user| user.user_id));
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    let expected: Vec<String> = (1..=5).rev().map(|n| user_id(n).to_string()).collect();
    assert_eq!(seen, expected);
}

#[rstest]
#[case("/users?limit=abc", "limit", "invalid_limit")]
#[case("/users?cursor=nope", "cursor", "invalid_cursor")]
#[actix_web::test]
async fn list_users_rejects_bad_page_params(
    #[case] uri: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state())).await;

    let res =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(detail_codes(&body), (Some(field), Some(code)));
}

#[rstest]
#[actix_web::test]
async fn internal_failures_are_redacted() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_create_user()
        .times(1)
        .return_once(|_| Err(Error::internal("connection refused by 10.0.0.5")));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let req = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(json!({"name": "Ada"}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Internal server error");
    assert!(body["trace_id"].is_string());
}

#[rstest]
#[actix_web::test]
async fn create_user_forwards_the_raw_name() {
    let mut ports = MockPorts::default();
    ports
        .users
        .expect_create_user()
        .withf(|name| name == "Grace")
        .times(1)
        .return_once(|name| {
            let name = crate::domain::DisplayName::new(name).expect("valid name");
            Ok(User::register(user_id(7), name, fixture_now()))
        });
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let req = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(json!({"name": "Grace"}))
        .to_request();
    let body: UserResponse = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.user_id, user_id(7).to_string());
}
