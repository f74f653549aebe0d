//! Vehicle handlers

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleDto};
use crate::domain::vehicle::VehicleFetchParams;
use crate::interfaces::http::common::{
    error_response, list_query, ApiResponse, ApiResult, ListParams, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "Vehicles; filters: user_id, brand, year; search: license_plate, brand, model", body = PaginatedResponse<VehicleDto>),
        (status = 400, description = "Invalid sort column or filter value")
    )
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<PaginatedResponse<VehicleDto>>> {
    let params: VehicleFetchParams = state.fetch_params(&list_query(&raw))?;
    let result = state
        .vehicles
        .list(&user.actor(), params)
        .await
        .map_err(error_response)?;
    Ok(Json(PaginatedResponse::from_result(result, VehicleDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle", body = ApiResponse<VehicleDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<VehicleDto>>> {
    let vehicle = state
        .vehicles
        .get(&user.actor(), &id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(vehicle.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered to the caller", body = ApiResponse<VehicleDto>),
        (status = 409, description = "License plate already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateVehicleRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<VehicleDto>>)> {
    let vehicle = state
        .vehicles
        .create(&user.actor(), request.into())
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(vehicle.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vehicle ID")),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<VehicleDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateVehicleRequest>,
) -> ApiResult<Json<ApiResponse<VehicleDto>>> {
    let vehicle = state
        .vehicles
        .update(&user.actor(), &id, request.into())
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(vehicle.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<String>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<String>>> {
    state
        .vehicles
        .delete(&user.actor(), &id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(format!("Vehicle '{}' deleted", id))))
}
