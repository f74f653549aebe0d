//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest};
use crate::interfaces::http::common::{error_response, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::users::UserDto;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials or disabled account")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let result = state
        .users
        .login(&request.email, &request.password)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(LoginResponse::from(result))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Customer account created", body = ApiResponse<UserDto>),
        (status = 409, description = "Email already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserDto>>)> {
    let user = state
        .users
        .register(&request.name, &request.email, request.phone, &request.password)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token revoked", body = ApiResponse<String>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<String>>> {
    state.users.logout(&user.token).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success("Logged out".to_string())))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserDto>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let me = state.users.me(&user.user_id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(UserDto::from(me))))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserDto>),
        (status = 400, description = "Unchanged or invalid values"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let updated = state
        .users
        .update_profile(&user.user_id, request.into())
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(UserDto::from(updated))))
}
