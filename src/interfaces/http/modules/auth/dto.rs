//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::AuthResult;
use crate::domain::user::UpdateUserDto;
use crate::interfaces::http::modules::users::UserDto;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserDto,
}

impl From<AuthResult> for LoginResponse {
    fn from(r: AuthResult) -> Self {
        Self {
            token: r.token,
            token_type: r.token_type,
            expires_in: r.expires_in,
            user: UserDto::from(r.user),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1–100 characters"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(max = 20, message = "phone must be at most 20 characters"))]
    pub phone: Option<String>,
    #[validate(length(min = 8, max = 128, message = "password must be 8–128 characters"))]
    pub password: String,
}

/// Profile update; omitted fields stay as they are.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1–100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "phone must be at most 20 characters"))]
    pub phone: Option<String>,
    #[validate(length(min = 8, max = 128, message = "password must be 8–128 characters"))]
    pub password: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateUserDto {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            phone: r.phone,
            password: r.password,
        }
    }
}
