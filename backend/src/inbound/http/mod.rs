//! HTTP inbound adapter exposing the ledger's REST endpoints.

use actix_web::web;

pub mod accounts;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod transactions;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register extractor error handlers and every ledger endpoint.
///
/// Health probes are registered separately because they need their own
/// `HealthState` app data.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use ledger::inbound::http::{configure, state::HttpState};
///
/// fn app(state: web::Data<HttpState>) {
///     let _ = App::new().app_data(state).configure(configure);
/// }
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::query_config())
        .app_data(validation::path_config())
        .service(users::create_user)
        .service(users::list_users)
        .service(users::get_user)
        .service(accounts::create_account)
        .service(accounts::list_accounts)
        .service(accounts::get_account)
        .service(transactions::deposit)
        .service(transactions::withdraw)
        .service(transactions::transfer)
        .service(transactions::list_transactions);
}

#[cfg(test)]
pub(crate) mod test_utils;
