//! Shared Diesel error mapping for the ledger repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// SQLSTATE raised when `lock_timeout` expires while waiting for a row lock.
const LOCK_NOT_AVAILABLE: &str = "55P03";

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Whether `error` is PostgreSQL giving up on a row lock.
///
/// Diesel has no dedicated kind for this state, so it is recognised through
/// the lock timeout message PostgreSQL emits.
pub fn is_lock_timeout(error: &DieselError) -> bool {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::Unknown, info) => {
            info.message().contains("lock timeout")
                || info.message().contains(LOCK_NOT_AVAILABLE)
        }
        _ => false,
    }
}

/// Map common Diesel error variants into query/connection constructors.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(String) -> E,
    C: Fn(String) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
            query(format!("constraint violated: {}", info.message()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            query(format!("reference violated: {}", info.message()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            query(format!("duplicate key: {}", info.message()))
        }
        DieselError::DatabaseError(_, _) => query("database error".to_owned()),
        _ => query("database error".to_owned()),
    }
}
