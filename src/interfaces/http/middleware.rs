//! Authentication middleware for Axum

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::UserService;
use crate::domain::{Actor, DomainError, UserRole};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken(String),
    InsufficientPermissions,
}

/// State for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<UserService>,
}

/// Authenticated caller, inserted into request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub role: UserRole,
    /// Raw bearer token, kept so logout can revoke it.
    pub token: String,
}

impl AuthenticatedUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id.as_str(), self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// JWT authentication middleware; rejects logged-out tokens.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(auth_header).map(String::from) else {
        return auth_error_response(AuthError::InvalidToken(
            "Invalid authentication token".into(),
        ));
    };

    match auth_state.users.authenticate(&token).await {
        Ok(claims) => {
            request.extensions_mut().insert(AuthenticatedUser {
                user_id: claims.sub,
                role: claims.role,
                token,
            });
            next.run(request).await
        }
        Err(DomainError::Unauthorized(message)) => {
            auth_error_response(AuthError::InvalidToken(message))
        }
        Err(e) => crate::interfaces::http::common::error_response(e).into_response(),
    }
}

/// Admin-only guard; must run after `auth_middleware`.
pub async fn admin_middleware(request: Request<Body>, next: Next) -> Response {
    let is_admin = request
        .extensions()
        .get::<AuthenticatedUser>()
        .is_some_and(AuthenticatedUser::is_admin);

    if !is_admin {
        return auth_error_response(AuthError::InsufficientPermissions);
    }
    next.run(request).await
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (
            StatusCode::UNAUTHORIZED,
            "Missing authentication token".to_string(),
        ),
        AuthError::InvalidToken(message) => (StatusCode::UNAUTHORIZED, message),
        AuthError::InsufficientPermissions => {
            (StatusCode::FORBIDDEN, "Insufficient permissions".to_string())
        }
    };

    let body = Json(json!({
        "success": false,
        "error": message
    }));

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_token("Bearer   "), None);
        assert_eq!(extract_token("Basic dXNlcg=="), None);
        assert_eq!(extract_token("abc.def"), None);
    }
}
