//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use serde_json::Value;

use crate::Trace;
use crate::domain::fixtures::{SequentialIds, fixture_clock};
use crate::domain::ports::{
    MockAccountsCommand, MockAccountsQuery, MockJournalQuery, MockLedgerCommand,
    MockUsersCommand, MockUsersQuery,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryLedger;

/// Mocked ports. Any port left without expectations panics when called.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub ledger: MockLedgerCommand,
    pub accounts: MockAccountsCommand,
    pub accounts_query: MockAccountsQuery,
    pub journal: MockJournalQuery,
    pub users: MockUsersCommand,
    pub users_query: MockUsersQuery,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            ledger: Arc::new(self.ledger),
            accounts: Arc::new(self.accounts),
            accounts_query: Arc::new(self.accounts_query),
            journal: Arc::new(self.journal),
            users: Arc::new(self.users),
            users_query: Arc::new(self.users_query),
        })
    }
}

/// Real services over `store` with deterministic ids and clock.
pub(crate) fn in_memory_state(store: &InMemoryLedger) -> HttpState {
    let store = Arc::new(store.clone());
    HttpState::new(HttpStatePorts::from_storage(
        store.clone(),
        store.clone(),
        store.clone(),
        store,
        Arc::new(SequentialIds::default()),
        fixture_clock(),
    ))
}

/// Application with the trace middleware and every ledger route.
pub(crate) fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .configure(configure)
}

/// Read `details.field` and `details.code` from an error body.
pub(crate) fn detail_codes(body: &Value) -> (Option<&str>, Option<&str>) {
    let details = &body["details"];
    (details["field"].as_str(), details["code"].as_str())
}
