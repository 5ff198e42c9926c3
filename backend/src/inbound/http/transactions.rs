//! Balance mutation and journal handlers.
//!
//! ```text
//! POST /accounts/{account_id}/deposit {"amount":"100.00"}
//! POST /accounts/{account_id}/withdraw {"amount":"25"}
//! POST /accounts/{account_id}/transfer {"to_account_id":"<uuid>","amount":30}
//! GET /accounts/{account_id}/transactions?limit=2&cursor=<transaction_id>
//! ```
//!
//! Every mutation runs under the deadline configured on [`HttpState`].

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use pagination::PageParams;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{DepositRequest, TransferRequest, WithdrawRequest};
use crate::domain::{AccountId, TransactionId, TransactionRecord};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, PageQuery, parse_id, parse_page, require};

const ACCOUNT_ID: FieldName = FieldName::new("account_id");
const AMOUNT: FieldName = FieldName::new("amount");

/// Request body for deposits and withdrawals.
///
/// `amount` accepts a decimal string or a JSON number.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AmountBody {
    #[schema(value_type = Option<String>, example = "100.00")]
    pub amount: Option<Decimal>,
}

/// Request body for transfers.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TransferBody {
    #[schema(example = "0190c5a8-8d7e-7c3b-9d2e-3f1a2b4c5d6e")]
    pub to_account_id: Option<String>,
    #[schema(value_type = Option<String>, example = "30")]
    pub amount: Option<Decimal>,
}

/// Identifier of the journal entry a mutation produced.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TransactionCreated {
    pub transaction_id: String,
}

impl From<TransactionId> for TransactionCreated {
    fn from(id: TransactionId) -> Self {
        Self {
            transaction_id: id.to_string(),
        }
    }
}

/// Counterparty links carried by transfer entries.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct TransactionMetadataResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<String>,
}

/// Journal entry representation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TransactionResponse {
    pub transaction_id: String,
    pub account_id: String,
    pub user_id: String,
    /// Signed change: positive credits, negative debits.
    #[schema(value_type = String, example = "-30")]
    pub amount: Decimal,
    /// Balance after the change.
    #[schema(value_type = String, example = "70")]
    pub balance: Decimal,
    /// `deposit`, `withdrawal` or `transfer`.
    #[serde(rename = "type")]
    #[schema(example = "transfer")]
    pub kind: String,
    #[schema(example = "completed")]
    pub status: String,
    pub metadata: TransactionMetadataResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&TransactionRecord> for TransactionResponse {
    fn from(record: &TransactionRecord) -> Self {
        let metadata = record.metadata();
        Self {
            transaction_id: record.id().to_string(),
            account_id: record.account_id().to_string(),
            user_id: record.user_id().to_string(),
            amount: record.amount(),
            balance: record.balance(),
            kind: record.kind().as_code().to_owned(),
            status: record.status().as_code().to_owned(),
            metadata: TransactionMetadataResponse {
                from_account_id: metadata.from_account_id.map(|id| id.to_string()),
                to_account_id: metadata.to_account_id.map(|id| id.to_string()),
            },
            created_at: record.created_at(),
            updated_at: record.updated_at(),
        }
    }
}

/// One page of journal entries.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionResponse>,
    pub next_cursor: Option<String>,
}

/// Credit an account.
#[utoipa::path(
    post,
    path = "/accounts/{account_id}/deposit",
    params(("account_id" = String, Path, description = "Account identifier")),
    request_body = AmountBody,
    responses(
        (status = 200, description = "Deposit committed", body = TransactionCreated),
        (status = 400, description = "Invalid amount", body = ErrorSchema),
        (status = 404, description = "Unknown account", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "deposit"
)]
#[post("/accounts/{account_id}/deposit")]
pub async fn deposit(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<AmountBody>,
) -> ApiResult<web::Json<TransactionCreated>> {
    let account_id: AccountId = parse_id(&path.into_inner(), ACCOUNT_ID)?;
    let amount = require(payload.into_inner().amount, AMOUNT)?;
    let id = state
        .ledger
        .deposit(DepositRequest {
            account_id,
            amount,
            deadline: state.deadline(),
        })
        .await?;
    Ok(web::Json(id.into()))
}

/// Debit an account without letting its balance go negative.
#[utoipa::path(
    post,
    path = "/accounts/{account_id}/withdraw",
    params(("account_id" = String, Path, description = "Account identifier")),
    request_body = AmountBody,
    responses(
        (status = 200, description = "Withdrawal committed", body = TransactionCreated),
        (status = 400, description = "Invalid amount or insufficient funds", body = ErrorSchema),
        (status = 404, description = "Unknown account", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "withdraw"
)]
#[post("/accounts/{account_id}/withdraw")]
pub async fn withdraw(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<AmountBody>,
) -> ApiResult<web::Json<TransactionCreated>> {
    let account_id: AccountId = parse_id(&path.into_inner(), ACCOUNT_ID)?;
    let amount = require(payload.into_inner().amount, AMOUNT)?;
    let id = state
        .ledger
        .withdraw(WithdrawRequest {
            account_id,
            amount,
            deadline: state.deadline(),
        })
        .await?;
    Ok(web::Json(id.into()))
}

/// Move money between two accounts atomically.
///
/// Returns the identifier of the debit entry on the source account.
#[utoipa::path(
    post,
    path = "/accounts/{account_id}/transfer",
    params(("account_id" = String, Path, description = "Source account identifier")),
    request_body = TransferBody,
    responses(
        (status = 200, description = "Transfer committed", body = TransactionCreated),
        (status = 400, description = "Invalid amount, self-transfer or insufficient funds", body = ErrorSchema),
        (status = 404, description = "Unknown source or destination", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "transfer"
)]
#[post("/accounts/{account_id}/transfer")]
pub async fn transfer(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<TransferBody>,
) -> ApiResult<web::Json<TransactionCreated>> {
    let from_account_id: AccountId = parse_id(&path.into_inner(), ACCOUNT_ID)?;
    let TransferBody {
        to_account_id,
        amount,
    } = payload.into_inner();
    let to_field = FieldName::new("to_account_id");
    let to_account_id: AccountId = parse_id(&require(to_account_id, to_field)?, to_field)?;
    let amount = require(amount, AMOUNT)?;
    let id = state
        .ledger
        .transfer(TransferRequest {
            from_account_id,
            to_account_id,
            amount,
            deadline: state.deadline(),
        })
        .await?;
    Ok(web::Json(id.into()))
}

/// List an account's journal, newest first.
#[utoipa::path(
    get,
    path = "/accounts/{account_id}/transactions",
    params(
        ("account_id" = String, Path, description = "Account identifier"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Journal entries", body = TransactionListResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown account", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "listTransactions"
)]
#[get("/accounts/{account_id}/transactions")]
pub async fn list_transactions(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<TransactionListResponse>> {
    let account_id: AccountId = parse_id(&path.into_inner(), ACCOUNT_ID)?;
    let page = parse_page::<TransactionId>(&PageParams::from(query.into_inner()))?;
    let (records, next) = state
        .journal
        .list_transactions(&account_id, page)
        .await?
        .into_parts();
    Ok(web::Json(TransactionListResponse {
        transactions: records.iter().map(TransactionResponse::from).collect(),
        next_cursor: next.map(|id| id.to_string()),
    }))
}

#[cfg(test)]
#[path = "transactions_tests.rs"]
mod tests;
