//! End-to-end HTTP tests over the in-memory store.
//!
//! The app is assembled from the public routing and state builders exactly as
//! the server does, then exercised through `actix_web::test`.

use std::collections::HashSet;
use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use ledger::Trace;
use ledger::domain::ports::UuidV7Generator;
use ledger::inbound::http::configure;
use ledger::inbound::http::state::{HttpState, HttpStatePorts};
use ledger::outbound::memory::InMemoryLedger;
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};

fn state() -> HttpState {
    let store = Arc::new(InMemoryLedger::new());
    HttpState::new(HttpStatePorts::from_storage(
        store.clone(),
        store.clone(),
        store.clone(),
        store,
        Arc::new(UuidV7Generator),
        Arc::new(DefaultClock),
    ))
}

async fn send<S>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

async fn post<S>(app: &S, uri: &str, payload: Value) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(
        app,
        test::TestRequest::post()
            .uri(uri)
            .set_json(payload)
            .to_request(),
    )
    .await
}

async fn get<S>(app: &S, uri: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(app, test::TestRequest::get().uri(uri).to_request()).await
}

fn id_of(body: &Value, field: &str) -> String {
    body[field]
        .as_str()
        .unwrap_or_else(|| panic!("{field} missing from {body}"))
        .to_owned()
}

#[actix_web::test]
async fn money_moves_between_accounts_and_is_journalled() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state()))
            .wrap(Trace)
            .configure(configure),
    )
    .await;

    let (status, user) = post(&app, "/users", json!({"name": "Grace"})).await;
    assert_eq!(status, StatusCode::OK);
    let user_id = id_of(&user, "user_id");

    let (_, savings) = post(
        &app,
        "/accounts",
        json!({"user_id": user_id, "name": "Savings"}),
    )
    .await;
    let (_, current) = post(
        &app,
        "/accounts",
        json!({"user_id": user_id, "name": "Current"}),
    )
    .await;
    let savings_id = id_of(&savings, "account_id");
    let current_id = id_of(&current, "account_id");
    assert_eq!(savings["balance"], "0");

    let (status, deposit) = post(
        &app,
        &format!("/accounts/{savings_id}/deposit"),
        json!({"amount": "100"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(deposit["transaction_id"].is_string());

    let (status, _) = post(
        &app,
        &format!("/accounts/{savings_id}/withdraw"),
        json!({"amount": "20.25"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(
        &app,
        &format!("/accounts/{savings_id}/transfer"),
        json!({"to_account_id": current_id, "amount": "30"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, savings) = get(&app, &format!("/accounts/{savings_id}")).await;
    let (_, current) = get(&app, &format!("/accounts/{current_id}")).await;
    assert_eq!(savings["balance"], "49.75");
    assert_eq!(current["balance"], "30");

    let (status, journal) = get(&app, &format!("/accounts/{savings_id}/transactions")).await;
    assert_eq!(status, StatusCode::OK);
    let entries = journal["transactions"].as_array().expect("entries");
    let kinds: Vec<_> = entries.iter().map(|e| e["type"].clone()).collect();
    assert_eq!(kinds, vec![json!("transfer"), json!("withdrawal"), json!("deposit")]);
    let latest = entries.first().expect("latest entry");
    assert_eq!(latest["amount"], "-30");
    assert_eq!(latest["balance"], "49.75");
    assert_eq!(latest["metadata"]["to_account_id"], current_id.as_str());
    assert!(journal["next_cursor"].is_null());

    let (_, owner) = get(&app, &format!("/users/{user_id}")).await;
    let owned: HashSet<_> = owner["account_ids"]
        .as_array()
        .expect("account ids")
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .collect();
    assert_eq!(owned, HashSet::from([savings_id, current_id]));
}

#[actix_web::test]
async fn failures_share_one_error_shape() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state()))
            .wrap(Trace)
            .configure(configure),
    )
    .await;

    let (_, user) = post(&app, "/users", json!({"name": "Linus"})).await;
    let (_, account) = post(
        &app,
        "/accounts",
        json!({"user_id": id_of(&user, "user_id"), "name": "Main"}),
    )
    .await;
    let account_id = id_of(&account, "account_id");

    let (status, body) = post(
        &app,
        &format!("/accounts/{account_id}/withdraw"),
        json!({"amount": "1"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "insufficient_funds");
    assert!(body["trace_id"].is_string());

    let (status, body) = post(
        &app,
        &format!("/accounts/{account_id}/deposit"),
        json!({"amount": "0"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "amount");

    let (status, body) = get(
        &app,
        "/accounts/0190a4c8-0000-7000-8000-000000000000",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert!(body["message"].is_string());

    let (_, after) = get(&app, &format!("/accounts/{account_id}")).await;
    assert_eq!(after["balance"], "0");
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[actix_web::test]
async fn account_pages_cover_every_account_once(#[case] limit: usize) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state()))
            .wrap(Trace)
            .configure(configure),
    )
    .await;

    let (_, user) = post(&app, "/users", json!({"name": "Barbara"})).await;
    let user_id = id_of(&user, "user_id");
    let mut created = HashSet::new();
    for n in 0..5 {
        let (_, account) = post(
            &app,
            "/accounts",
            json!({"user_id": user_id, "name": format!("Pot {n}")}),
        )
        .await;
        created.insert(id_of(&account, "account_id"));
    }

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let uri = match &cursor {
            Some(cursor) => format!("/accounts?user_id={user_id}&limit={limit}&cursor={cursor}"),
            None => format!("/accounts?user_id={user_id}&limit={limit}"),
        };
        let (status, page) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::OK);
        let accounts = page["accounts"].as_array().expect("accounts");
        assert!(accounts.len() <= limit);
        seen.extend(accounts.iter().map(|a| id_of(a, "account_id")));
        match page["next_cursor"].as_str() {
            Some(next) => cursor = Some(next.to_owned()),
            None => break,
        }
        assert!(seen.len() <= created.len(), "pagination did not terminate");
    }

    let distinct: HashSet<_> = seen.iter().cloned().collect();
    assert_eq!(distinct.len(), seen.len(), "pages overlap: {seen:?}");
    assert_eq!(distinct, created);
}
