//! Shared HTTP types: response envelope, pagination, error mapping and
//! list-query parsing.

pub mod validated_json;

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{DomainError, ListQuery};
use crate::shared::PaginatedResult;

pub use validated_json::ValidatedJson;

/// Envelope for every JSON response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Envelope for list endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn from_result<U>(result: PaginatedResult<U>, f: impl FnMut(U) -> T) -> Self {
        let result = result.map(f);
        Self {
            success: true,
            data: result.items,
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
        }
    }
}

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<T, ApiError>;

/// Map a domain failure onto its HTTP status.
pub fn error_response(e: DomainError) -> ApiError {
    let status = match &e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::InvalidTransition(_) | DomainError::Unprocessable(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::InvalidSortColumn(_) | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Database(_) | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(error = %e, "Request failed");
    }
    (status, Json(ApiResponse::error(e.to_string())))
}

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::error(message)))
}

/// Query parameters accepted by every list endpoint (documentation only;
/// handlers read the raw map so `filters[<field>]` keys survive).
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
pub struct ListParams {
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page (1-100)
    pub limit: Option<i64>,
    /// Case-insensitive substring search
    pub search: Option<String>,
    /// Sort column
    pub order_by: Option<String>,
    /// `asc` or `desc`
    pub order_direction: Option<String>,
    /// Field filters as `filters[<field>]=<value>`; a JSON string array means IN
    #[param(value_type = Option<Object>)]
    pub filters: Option<HashMap<String, String>>,
}

/// Build a [`ListQuery`] from raw query parameters.
///
/// Unparseable `page`/`limit` values fall back to defaults.
pub fn list_query(params: &HashMap<String, String>) -> ListQuery {
    let mut filters: Vec<(String, String)> = params
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix("filters[")
                .and_then(|rest| rest.strip_suffix(']'))
                .filter(|field| !field.is_empty())
                .map(|field| (field.to_string(), value.clone()))
        })
        .collect();
    filters.sort();

    let text = |key: &str| {
        params
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let number = |key: &str| params.get(key).and_then(|v| v.trim().parse::<i64>().ok());

    ListQuery {
        search: text("search"),
        filters,
        order_by: text("order_by"),
        order_direction: text("order_direction"),
        page: number("page"),
        limit: number("limit"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransitionRejection;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn list_query_reads_bracketed_filters() {
        let q = list_query(&params(&[
            ("filters[status]", r#"["pending","confirmed"]"#),
            ("filters[customer_id]", "c-1"),
            ("filters[]", "ignored"),
            ("search", "  brake "),
            ("order_by", "booking_date"),
            ("page", "2"),
            ("limit", "abc"),
        ]));

        assert_eq!(
            q.filters,
            vec![
                ("customer_id".to_string(), "c-1".to_string()),
                ("status".to_string(), r#"["pending","confirmed"]"#.to_string()),
            ]
        );
        assert_eq!(q.search.as_deref(), Some("brake"));
        assert_eq!(q.order_by.as_deref(), Some("booking_date"));
        assert_eq!(q.page, Some(2));
        assert_eq!(q.limit, None);
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::not_found("Booking", "x"), StatusCode::NOT_FOUND),
            (
                DomainError::InvalidTransition(TransitionRejection::TerminalState {
                    entity: "booking",
                    status: "completed".into(),
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (DomainError::Conflict("c".into()), StatusCode::CONFLICT),
            (DomainError::InvalidSortColumn("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Validation("v".into()), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized("u".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("f".into()), StatusCode::FORBIDDEN),
            (DomainError::Database("d".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::Unprocessable("p".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::Internal("i".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let (status, Json(body)) = error_response(err);
            assert_eq!(status, expected);
            assert!(!body.success);
            assert!(body.error.is_some());
        }
    }
}
