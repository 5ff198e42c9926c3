//! Users API handlers.
//!
//! ```text
//! POST /users {"name":"Ada"}
//! GET /users?limit=2&cursor=<user_id>
//! GET /users/{user_id}
//! ```

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use pagination::PageParams;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{User, UserDetails, UserId};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, PageQuery, parse_id, parse_page, require};

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserBody {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
}

/// User representation returned by the API.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(value_type = String, example = "0190c5a8-8d7e-7c3b-9d2e-3f1a2b4c5d6e")]
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Live accounts owned by the user; present on single-user reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_ids: Option<Vec<String>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id().to_string(),
            name: user.name().to_string(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
            account_ids: None,
        }
    }
}

impl From<UserDetails> for UserResponse {
    fn from(details: UserDetails) -> Self {
        let mut response = Self::from(&details.user);
        response.account_ids = Some(details.account_ids.iter().map(ToString::to_string).collect());
        response
    }
}

/// One page of users.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    /// Pass back as `cursor` to fetch the next page; absent on the last page.
    pub next_cursor: Option<String>,
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserBody,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<web::Json<UserResponse>> {
    let name = require(payload.into_inner().name, FieldName::new("name"))?;
    let user = state.users.create_user(name).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// List users, newest first.
#[utoipa::path(
    get,
    path = "/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Users", body = UserListResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<UserListResponse>> {
    let page = parse_page::<UserId>(&PageParams::from(query.into_inner()))?;
    let (users, next) = state.users_query.list_users(page).await?.into_parts();
    Ok(web::Json(UserListResponse {
        users: users.iter().map(UserResponse::from).collect(),
        next_cursor: next.map(|id| id.to_string()),
    }))
}

/// Fetch a user together with their account identifiers.
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id: UserId = parse_id(&path.into_inner(), FieldName::new("user_id"))?;
    let details = state.users_query.get_user(&user_id).await?;
    Ok(web::Json(UserResponse::from(details)))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
