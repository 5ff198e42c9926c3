//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed ledger entities used by the API and
//! persistence layers, plus the services that apply balance rules through
//! the ports in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Account, User, TransactionRecord — ledger aggregates.
//! - LedgerService, AccountsService, UsersService — driving port
//!   implementations.

pub mod account;
pub mod accounts_service;
pub mod error;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod journal;
pub mod ledger_service;
pub mod money;
pub mod name;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod users_service;

pub use self::account::{Account, AccountDraft, AccountValidationError, BalanceError};
pub use self::accounts_service::AccountsService;
pub use self::error::{Error, ErrorCode};
pub use self::ids::{AccountId, TransactionId, UserId};
pub use self::journal::{
    TransactionDraft, TransactionKind, TransactionMetadata, TransactionRecord, TransactionStatus,
    UnknownCodeError,
};
pub use self::ledger_service::LedgerService;
pub use self::money::{AMOUNT_MAX, AMOUNT_SCALE, Amount, AmountError};
pub use self::name::{DISPLAY_NAME_MAX, DisplayName, NameError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserDetails};
pub use self::users_service::UsersService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use ledger::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
