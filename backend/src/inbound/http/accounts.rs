//! Accounts API handlers.
//!
//! ```text
//! POST /accounts {"user_id":"<uuid>","name":"Savings"}
//! GET /accounts?user_id=<uuid>&limit=2&cursor=<account_id>
//! GET /accounts/{account_id}
//! ```

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use pagination::PageParams;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::CreateAccountRequest;
use crate::domain::{Account, AccountId, UserId};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_page, require};

/// Request body for `POST /accounts`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateAccountBody {
    #[schema(example = "0190c5a8-8d7e-7c3b-9d2e-3f1a2b4c5d6e")]
    pub user_id: Option<String>,
    #[schema(example = "Savings")]
    pub name: Option<String>,
}

/// Account representation returned by the API.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AccountResponse {
    pub account_id: String,
    pub user_id: String,
    pub name: String,
    /// Decimal string, never negative.
    #[schema(value_type = String, example = "70.00")]
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id().to_string(),
            user_id: account.user_id().to_string(),
            name: account.name().to_string(),
            balance: account.balance(),
            created_at: account.created_at(),
            updated_at: account.updated_at(),
        }
    }
}

/// One page of accounts.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AccountListResponse {
    pub accounts: Vec<AccountResponse>,
    pub next_cursor: Option<String>,
}

/// Query parameters for `GET /accounts`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AccountListQuery {
    /// Only list accounts owned by this user.
    pub user_id: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<String>,
}

/// Open a zero-balance account for an existing user.
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = CreateAccountBody,
    responses(
        (status = 200, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "createAccount"
)]
#[post("/accounts")]
pub async fn create_account(
    state: web::Data<HttpState>,
    payload: web::Json<CreateAccountBody>,
) -> ApiResult<web::Json<AccountResponse>> {
    let CreateAccountBody { user_id, name } = payload.into_inner();
    let user_field = FieldName::new("user_id");
    let user_id: UserId = parse_id(&require(user_id, user_field)?, user_field)?;
    let name = require(name, FieldName::new("name"))?;
    let account = state
        .accounts
        .create_account(CreateAccountRequest { user_id, name })
        .await?;
    Ok(web::Json(AccountResponse::from(&account)))
}

/// List live accounts, newest first, optionally filtered by owner.
#[utoipa::path(
    get,
    path = "/accounts",
    params(AccountListQuery),
    responses(
        (status = 200, description = "Accounts", body = AccountListResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "listAccounts"
)]
#[get("/accounts")]
pub async fn list_accounts(
    state: web::Data<HttpState>,
    query: web::Query<AccountListQuery>,
) -> ApiResult<web::Json<AccountListResponse>> {
    let AccountListQuery {
        user_id,
        cursor,
        limit,
    } = query.into_inner();
    let user_id = user_id
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_id::<UserId>(&raw, FieldName::new("user_id")))
        .transpose()?;
    let page = parse_page::<AccountId>(&PageParams { cursor, limit })?;
    let (accounts, next) = state
        .accounts_query
        .list_accounts(user_id, page)
        .await?
        .into_parts();
    Ok(web::Json(AccountListResponse {
        accounts: accounts.iter().map(AccountResponse::from).collect(),
        next_cursor: next.map(|id| id.to_string()),
    }))
}

/// Fetch a live account.
#[utoipa::path(
    get,
    path = "/accounts/{account_id}",
    params(("account_id" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account", body = AccountResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "getAccount"
)]
#[get("/accounts/{account_id}")]
pub async fn get_account(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<AccountResponse>> {
    let account_id: AccountId = parse_id(&path.into_inner(), FieldName::new("account_id"))?;
    let account = state.accounts_query.get_account(&account_id).await?;
    Ok(web::Json(AccountResponse::from(&account)))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
