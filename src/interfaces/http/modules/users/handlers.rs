//! User management API handlers
//!
//! Delegates to `UserService` from the application/identity layer.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateUserRequest, UserDto};
use crate::domain::user::UserFetchParams;
use crate::interfaces::http::common::{
    error_response, list_query, ApiResponse, ApiResult, ListParams, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "User list; filters: role, is_active; sort: name, email, created_at, updated_at", body = PaginatedResponse<UserDto>),
        (status = 400, description = "Invalid sort column"),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<PaginatedResponse<UserDto>>> {
    user.actor().require_staff().map_err(error_response)?;
    let params: UserFetchParams = state.fetch_params(&list_query(&raw))?;

    let result = state.users.list_users(params).await.map_err(error_response)?;
    Ok(Json(PaginatedResponse::from_result(result, UserDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    user.actor().require_staff().map_err(error_response)?;
    let found = state.users.get_user(&id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(UserDto::from(found))))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Email already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserDto>>)> {
    if !user.is_admin() {
        return Err(error_response(crate::domain::DomainError::Forbidden(
            "admin role required".into(),
        )));
    }
    let created = state
        .users
        .create_staff(request.into())
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(created))),
    ))
}
