//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper yields an `invalid_request` error whose details name the
//! offending `field`, a stable `code` and, when available, the raw `value`.

use std::str::FromStr;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use pagination::{PageParams, PageRequest, PaginationError};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidLimit,
    InvalidCursor,
    MalformedBody,
    MalformedQuery,
    MalformedPath,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidLimit => "invalid_limit",
            ErrorCode::InvalidCursor => "invalid_cursor",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::MalformedQuery => "malformed_query",
            ErrorCode::MalformedPath => "malformed_path",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(message: impl Into<String>, field: &str, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

fn field_value_error(
    message: impl Into<String>,
    field: &str,
    code: ErrorCode,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
        "value": value,
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(
        format!("missing required field: {field}"),
        field,
        ErrorCode::MissingField,
    )
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    field_value_error(
        format!("{field} must be a valid UUID"),
        field,
        ErrorCode::InvalidUuid,
        value,
    )
}

/// Parse a UUID-backed identifier, reporting `field` on failure.
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid_uuid_error(field, value))
}

/// Require an optional body field to be present.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn pagination_error(error: &PaginationError) -> Error {
    let code = match error {
        PaginationError::InvalidLimit { .. } => ErrorCode::InvalidLimit,
        PaginationError::InvalidCursor { .. } => ErrorCode::InvalidCursor,
    };
    field_value_error(error.to_string(), error.field(), code, error.value())
}

/// Parse `limit` and `cursor` query parameters into a typed page request.
pub(crate) fn parse_page<C: FromStr>(params: &PageParams) -> Result<PageRequest<C>, Error> {
    params.parse().map_err(|err| pagination_error(&err))
}

/// Query parameters shared by paginated listings.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Identifier of the last item already seen.
    pub cursor: Option<String>,
    /// Page size; defaults to 100 when absent or non-positive.
    pub limit: Option<String>,
}

impl From<PageQuery> for PageParams {
    fn from(query: PageQuery) -> Self {
        Self {
            cursor: query.cursor,
            limit: query.limit,
        }
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "request body must be application/json".to_owned(),
        other => format!("malformed JSON body: {other}"),
    };
    field_error(message, "body", ErrorCode::MalformedBody).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    field_error(
        format!("malformed query string: {err}"),
        "query",
        ErrorCode::MalformedQuery,
    )
    .into()
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    field_error(
        format!("malformed path: {err}"),
        "path",
        ErrorCode::MalformedPath,
    )
    .into()
}

/// Extractor configuration turning JSON body failures into domain errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Extractor configuration turning query-string failures into domain errors.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

/// Extractor configuration turning path failures into domain errors.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error_handler)
}
