//! Builds the HTTP state over whichever store the configuration selects.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use ledger::domain::ports::UuidV7Generator;
use ledger::inbound::http::state::{HttpState, HttpStatePorts};
use ledger::outbound::memory::InMemoryLedger;
use ledger::outbound::persistence::{
    DieselAccountRepository, DieselJournalRepository, DieselLedgerStore, DieselUserRepository,
};

use super::ServerConfig;

pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ids = Arc::new(UuidV7Generator);
    let clock = Arc::new(DefaultClock);
    let ports = match &config.db_pool {
        Some(pool) => {
            info!("serving from PostgreSQL");
            HttpStatePorts::from_storage(
                Arc::new(DieselLedgerStore::new(pool.clone(), config.lock_timeout)),
                Arc::new(DieselAccountRepository::new(pool.clone())),
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselJournalRepository::new(pool.clone())),
                ids,
                clock,
            )
        }
        None => {
            let store = Arc::new(InMemoryLedger::with_lock_timeout(config.lock_timeout));
            HttpStatePorts::from_storage(store.clone(), store.clone(), store.clone(), store, ids, clock)
        }
    };
    web::Data::new(HttpState::new(ports).with_request_timeout(config.request_timeout))
}
