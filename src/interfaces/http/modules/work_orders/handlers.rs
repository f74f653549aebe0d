//! Work order handlers

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{AssignMechanicRequest, WorkOrderDto};
use crate::domain::work_order::WorkOrderFetchParams;
use crate::domain::WorkOrderStatus;
use crate::interfaces::http::common::{
    error_response, list_query, ApiResponse, ApiResult, ListParams, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::bookings::{RowsAffected, UpdateStatusRequest};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/work-orders",
    tag = "Work Orders",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "Work orders (customers see their own, mechanics their assignments); filters: customer_id, vehicle_id, mechanic_id, booking_id, status; search: notes, status; sort: status, created_at, updated_at", body = PaginatedResponse<WorkOrderDto>),
        (status = 400, description = "Invalid sort column")
    )
)]
pub async fn list_work_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<PaginatedResponse<WorkOrderDto>>> {
    let params: WorkOrderFetchParams = state.fetch_params(&list_query(&raw))?;
    let result = state
        .work_orders
        .fetch(&user.actor(), params)
        .await
        .map_err(error_response)?;
    Ok(Json(PaginatedResponse::from_result(result, WorkOrderDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/work-orders/{id}",
    tag = "Work Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Work order ID")),
    responses(
        (status = 200, description = "Work order with service lines", body = ApiResponse<WorkOrderDto>),
        (status = 403, description = "Not visible to the caller"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<WorkOrderDto>>> {
    let work_order = state
        .work_orders
        .get(&user.actor(), &id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(work_order.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/work-orders/from-booking/{booking_id}",
    tag = "Work Orders",
    security(("bearer_auth" = [])),
    params(("booking_id" = String, Path, description = "Confirmed booking ID")),
    responses(
        (status = 201, description = "Work order created", body = ApiResponse<WorkOrderDto>),
        (status = 403, description = "Admin or cashier only"),
        (status = 404, description = "Booking not found"),
        (status = 422, description = "Booking is not confirmed")
    )
)]
pub async fn create_from_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<String>,
) -> ApiResult<(StatusCode, Json<ApiResponse<WorkOrderDto>>)> {
    let work_order = state
        .work_orders
        .create_from_booking(&user.actor(), &booking_id)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(work_order.into())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/work-orders/{id}/assign-mechanic",
    tag = "Work Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Work order ID")),
    request_body = AssignMechanicRequest,
    responses(
        (status = 200, description = "Mechanic assigned, status on_progress", body = ApiResponse<RowsAffected>),
        (status = 403, description = "Admin or cashier only"),
        (status = 404, description = "Work order not found"),
        (status = 409, description = "Status changed concurrently"),
        (status = 422, description = "Not a mechanic, or work order is not open")
    )
)]
pub async fn assign_mechanic(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<AssignMechanicRequest>,
) -> ApiResult<Json<ApiResponse<RowsAffected>>> {
    let actor = user.actor();
    let rows_affected = state
        .work_orders
        .assign_mechanic(&actor, &id, &request.mechanic_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(RowsAffected { rows_affected })))
}

#[utoipa::path(
    put,
    path = "/api/v1/work-orders/{id}/status",
    tag = "Work Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Work order ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status written", body = ApiResponse<RowsAffected>),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Customers, or mechanics not assigned"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_work_order_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<Json<ApiResponse<RowsAffected>>> {
    let status: WorkOrderStatus = request
        .status
        .trim()
        .to_lowercase()
        .parse()
        .map_err(error_response)?;
    let rows_affected = state
        .work_orders
        .update_status(&user.actor(), &id, status)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(RowsAffected { rows_affected })))
}
