//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every ledger endpoint, the health probes and the
//! error schema wrappers. Swagger UI serves it in debug builds and the
//! `openapi-dump` binary prints it for external tooling.

use crate::inbound::http::accounts::{
    AccountListResponse, AccountResponse, CreateAccountBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::transactions::{
    AmountBody, TransactionCreated, TransactionListResponse, TransactionMetadataResponse,
    TransactionResponse, TransferBody,
};
use crate::inbound::http::users::{CreateUserBody, UserListResponse, UserResponse};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ledger API",
        description = "Users, accounts, balance mutations and per-account journals."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::accounts::create_account,
        crate::inbound::http::accounts::list_accounts,
        crate::inbound::http::accounts::get_account,
        crate::inbound::http::transactions::deposit,
        crate::inbound::http::transactions::withdraw,
        crate::inbound::http::transactions::transfer,
        crate::inbound::http::transactions::list_transactions,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateUserBody,
        UserResponse,
        UserListResponse,
        CreateAccountBody,
        AccountResponse,
        AccountListResponse,
        AmountBody,
        TransferBody,
        TransactionCreated,
        TransactionMetadataResponse,
        TransactionResponse,
        TransactionListResponse,
    )),
    tags(
        (name = "users", description = "Account owners"),
        (name = "accounts", description = "Account lifecycle and reads"),
        (name = "transactions", description = "Balance mutations and journals"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
