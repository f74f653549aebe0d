//! Service catalog handlers. Reads are public; writes are admin-only.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateServiceOfferingRequest, ServiceOfferingDto, UpdateServiceOfferingRequest};
use crate::domain::catalog::ServiceOfferingFetchParams;
use crate::interfaces::http::common::{
    error_response, list_query, ApiResponse, ApiResult, ListParams, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/services",
    tag = "Services",
    params(ListParams),
    responses(
        (status = 200, description = "Service offerings; search: name, description; sort: name, price, created_at, updated_at", body = PaginatedResponse<ServiceOfferingDto>),
        (status = 400, description = "Invalid sort column")
    )
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<PaginatedResponse<ServiceOfferingDto>>> {
    let params: ServiceOfferingFetchParams = state.fetch_params(&list_query(&raw))?;
    let result = state.catalog.list(params).await.map_err(error_response)?;
    Ok(Json(PaginatedResponse::from_result(
        result,
        ServiceOfferingDto::from,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/services/{id}",
    tag = "Services",
    params(("id" = String, Path, description = "Service offering ID")),
    responses(
        (status = 200, description = "Service offering", body = ApiResponse<ServiceOfferingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ServiceOfferingDto>>> {
    let offering = state.catalog.get(&id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(offering.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/services",
    tag = "Services",
    security(("bearer_auth" = [])),
    request_body = CreateServiceOfferingRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<ServiceOfferingDto>),
        (status = 403, description = "Admin only"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateServiceOfferingRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ServiceOfferingDto>>)> {
    let offering = state
        .catalog
        .create(&user.actor(), &request.name, request.description, request.price)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(offering.into())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/services/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Service offering ID")),
    request_body = UpdateServiceOfferingRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<ServiceOfferingDto>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_service(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateServiceOfferingRequest>,
) -> ApiResult<Json<ApiResponse<ServiceOfferingDto>>> {
    let offering = state
        .catalog
        .update(&user.actor(), &id, request.into())
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(offering.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/services/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Service offering ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<String>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_service(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<String>>> {
    state
        .catalog
        .delete(&user.actor(), &id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(format!("Service '{}' deleted", id))))
}
