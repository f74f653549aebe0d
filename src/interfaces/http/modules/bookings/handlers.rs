//! Booking handlers

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{BookingDto, CreateBookingRequest, RowsAffected, UpdateStatusRequest};
use crate::domain::booking::BookingFetchParams;
use crate::domain::BookingStatus;
use crate::interfaces::http::common::{
    error_response, list_query, ApiResponse, ApiResult, ListParams, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "Bookings (customers see their own); filters: customer_id, vehicle_id, status; search: notes; sort: booking_date, status, created_at, updated_at", body = PaginatedResponse<BookingDto>),
        (status = 400, description = "Invalid sort column")
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<PaginatedResponse<BookingDto>>> {
    let params: BookingFetchParams = state.fetch_params(&list_query(&raw))?;
    let result = state
        .bookings
        .fetch(&user.actor(), params)
        .await
        .map_err(error_response)?;
    Ok(Json(PaginatedResponse::from_result(result, BookingDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking with attached services", body = ApiResponse<BookingDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<BookingDto>>> {
    let booking = state
        .bookings
        .get(&user.actor(), &id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Pending booking created", body = ApiResponse<BookingDto>),
        (status = 403, description = "Vehicle belongs to someone else"),
        (status = 404, description = "Vehicle not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .bookings
        .create(&user.actor(), request.into())
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(booking.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/status",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Booking ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<RowsAffected>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Status changed concurrently"),
        (status = 422, description = "Transition not allowed")
    )
)]
pub async fn update_booking_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<Json<ApiResponse<RowsAffected>>> {
    let requested: BookingStatus = request
        .status
        .trim()
        .to_lowercase()
        .parse()
        .map_err(error_response)?;
    let rows_affected = state
        .bookings
        .update_status(&user.actor(), &id, requested)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(RowsAffected { rows_affected })))
}
