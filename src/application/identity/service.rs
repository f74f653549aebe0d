//! User management service — application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::user::{CreateUserDto, UpdateUserDto, UserFetchParams};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::{
    create_token, hash_password, hash_token, verify_password, verify_token, JwtConfig,
    TokenClaims,
};
use crate::shared::PaginatedResult;

const MIN_PASSWORD_LEN: usize = 8;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// User service — orchestrates all identity / user-management use-cases.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost,
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by email + password and return a JWT.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.repos.users().find_by_email(&email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            warn!(user_id = %user.id, "Rejected login with wrong password");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(&user.id, user.role, &self.jwt_config)
            .map_err(|e| DomainError::Validation(format!("Failed to create token: {}", e)))?;

        let now = Utc::now();
        self.repos.users().touch_last_login(&user.id, now).await?;

        info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user: User {
                last_login_at: Some(now),
                ..user
            },
        })
    }

    /// Decode a bearer token and make sure it has not been logged out.
    pub async fn authenticate(&self, token: &str) -> DomainResult<TokenClaims> {
        let claims = verify_token(token, &self.jwt_config)
            .map_err(|e| DomainError::Unauthorized(format!("Invalid token: {}", e)))?;

        if self.repos.revoked_tokens().is_revoked(&hash_token(token)).await? {
            return Err(DomainError::Unauthorized("Token has been revoked".into()));
        }
        Ok(claims)
    }

    /// Revoke a token until its natural expiry.
    pub async fn logout(&self, token: &str) -> DomainResult<()> {
        let claims = self.authenticate(token).await?;
        self.repos
            .revoked_tokens()
            .revoke(&hash_token(token), claims.expires_at())
            .await?;

        let purged = self.repos.revoked_tokens().purge_expired(Utc::now()).await?;
        info!(user_id = %claims.sub, purged, "User logged out");
        Ok(())
    }

    // ── Registration ────────────────────────────────────────────

    /// Self-service registration; always yields a customer.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        phone: Option<String>,
        password: &str,
    ) -> DomainResult<User> {
        let user = self
            .create_user(CreateUserDto {
                name: name.to_string(),
                email: email.to_string(),
                phone,
                role: UserRole::Customer,
                password: password.to_string(),
            })
            .await?;

        info!(user_id = %user.id, "New customer registered");
        Ok(user)
    }

    /// Admin-created account with any role.
    pub async fn create_staff(&self, dto: CreateUserDto) -> DomainResult<User> {
        let user = self.create_user(dto).await?;
        info!(user_id = %user.id, role = %user.role, "User account created by admin");
        Ok(user)
    }

    /// Create the bootstrap admin when no user exists yet.
    pub async fn ensure_default_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<Option<User>> {
        if self.repos.users().count().await? > 0 {
            return Ok(None);
        }

        let admin = self
            .create_user(CreateUserDto {
                name: name.to_string(),
                email: email.to_string(),
                phone: None,
                role: UserRole::Admin,
                password: password.to_string(),
            })
            .await?;

        warn!(email = %admin.email, "Created default admin account, change its password");
        Ok(Some(admin))
    }

    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let name = dto.name.trim();
        let email = dto.email.trim().to_lowercase();

        if name.is_empty() {
            return Err(DomainError::Validation("Name is required".into()));
        }
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }
        if dto.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }
        if self.repos.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let password_hash = hash_password(&dto.password, self.bcrypt_cost)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;

        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email,
            phone: dto.phone.filter(|p| !p.trim().is_empty()),
            password_hash,
            role: dto.role,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        self.repos.users().create(&user).await?;
        Ok(user)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Current user's profile.
    pub async fn me(&self, user_id: &str) -> DomainResult<User> {
        self.get_user(user_id).await
    }

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// List users with search, filtering, sorting and pagination.
    pub async fn list_users(&self, params: UserFetchParams) -> DomainResult<PaginatedResult<User>> {
        let (items, total) = self.repos.users().fetch(&params).await?;
        Ok(PaginatedResult::new(items, total, params.page))
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Update profile fields. Submitting a value equal to the stored one is
    /// rejected so clients notice no-op edits.
    pub async fn update_profile(&self, user_id: &str, dto: UpdateUserDto) -> DomainResult<User> {
        if dto.is_empty() {
            return Err(DomainError::Validation("Nothing to update".into()));
        }

        let mut user = self.get_user(user_id).await?;

        if let Some(name) = dto.name.as_deref().map(str::trim) {
            if name.is_empty() {
                return Err(DomainError::Validation("Name is required".into()));
            }
            if name == user.name {
                return Err(DomainError::Validation("Name is the same as before".into()));
            }
            user.name = name.to_string();
        }

        if let Some(phone) = dto.phone.as_deref().map(str::trim) {
            if user.phone.as_deref() == Some(phone) {
                return Err(DomainError::Validation("Phone is the same as before".into()));
            }
            user.phone = Some(phone.to_string()).filter(|p| !p.is_empty());
        }

        if let Some(email) = dto.email.as_deref().map(|e| e.trim().to_lowercase()) {
            if email == user.email {
                return Err(DomainError::Validation("Email is the same as before".into()));
            }
            if !email.contains('@') {
                return Err(DomainError::Validation("Invalid email address".into()));
            }
            if self.repos.users().find_by_email(&email).await?.is_some() {
                return Err(DomainError::Conflict("Email already exists".into()));
            }
            user.email = email;
        }

        if let Some(password) = dto.password.as_deref() {
            if password.len() < MIN_PASSWORD_LEN {
                return Err(DomainError::Validation(
                    "New password must be at least 8 characters".into(),
                ));
            }
            if verify_password(password, &user.password_hash).unwrap_or(false) {
                return Err(DomainError::Validation(
                    "Password is the same as before".into(),
                ));
            }
            user.password_hash = hash_password(password, self.bcrypt_cost)
                .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;
        }

        user.updated_at = Utc::now();
        self.repos.users().update(&user).await?;

        info!(user_id, "Profile updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::ListQuery;
    use crate::infrastructure::crypto::password::TEST_COST;
    use crate::infrastructure::database::repositories::testing::{seed_user, test_repos};

    async fn service() -> UserService {
        let (_db, repos) = test_repos().await;
        let config = JwtConfig {
            secret: "test-secret".into(),
            ..JwtConfig::default()
        };
        UserService::new(Arc::new(repos), config, TEST_COST)
    }

    #[tokio::test]
    async fn register_then_login() {
        let svc = service().await;
        let user = svc
            .register("Budi", "Budi@Example.com", None, "password123")
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Customer);
        assert_eq!(user.email, "budi@example.com");

        let auth = svc.login("budi@example.com", "password123").await.unwrap();
        assert_eq!(auth.token_type, "Bearer");
        assert!(auth.user.last_login_at.is_some());

        let claims = svc.authenticate(&auth.token).await.unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, UserRole::Customer);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let svc = service().await;
        svc.register("A", "a@example.com", None, "password123").await.unwrap();
        let err = svc
            .register("B", "A@example.com", None, "password123")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn wrong_password_and_disabled_accounts_are_unauthorized() {
        let svc = service().await;
        let mut user = svc
            .register("A", "a@example.com", None, "password123")
            .await
            .unwrap();

        let err = svc.login("a@example.com", "wrong-password").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        user.is_active = false;
        svc.repos.users().update(&user).await.unwrap();
        let err = svc.login("a@example.com", "password123").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn logout_revokes_the_token() {
        let svc = service().await;
        svc.register("A", "a@example.com", None, "password123").await.unwrap();
        let auth = svc.login("a@example.com", "password123").await.unwrap();

        svc.logout(&auth.token).await.unwrap();

        let err = svc.authenticate(&auth.token).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
        // a second logout with the same token is refused as well
        assert!(svc.logout(&auth.token).await.is_err());
    }

    #[tokio::test]
    async fn update_profile_rejects_unchanged_values() {
        let svc = service().await;
        let user = svc
            .register("Sari", "sari@example.com", Some("0811".into()), "password123")
            .await
            .unwrap();

        let same_name = UpdateUserDto {
            name: Some("Sari".into()),
            ..Default::default()
        };
        assert!(matches!(
            svc.update_profile(&user.id, same_name).await,
            Err(DomainError::Validation(_))
        ));

        let same_password = UpdateUserDto {
            password: Some("password123".into()),
            ..Default::default()
        };
        assert!(matches!(
            svc.update_profile(&user.id, same_password).await,
            Err(DomainError::Validation(_))
        ));

        let updated = svc
            .update_profile(
                &user.id,
                UpdateUserDto {
                    phone: Some("0822".into()),
                    password: Some("new-password".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("0822"));
        assert!(svc.login("sari@example.com", "new-password").await.is_ok());
    }

    #[tokio::test]
    async fn hashing_failure_is_an_internal_error() {
        let (_db, repos) = test_repos().await;
        // bcrypt refuses costs below 4
        let svc = UserService::new(Arc::new(repos), JwtConfig::default(), 3);

        let err = svc
            .register("A", "a@example.com", None, "password123")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)), "{err}");
        assert_eq!(svc.repos.users().count().await.unwrap(), 0);

        let user = seed_user(&*svc.repos, "b@example.com", UserRole::Customer).await;
        let err = svc
            .update_profile(
                &user.id,
                UpdateUserDto {
                    password: Some("new-password".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)), "{err}");
    }

    #[tokio::test]
    async fn default_admin_only_on_empty_table() {
        let svc = service().await;
        let created = svc
            .ensure_default_admin("Admin", "admin@workshop.local", "admin12345")
            .await
            .unwrap();
        assert_eq!(created.map(|u| u.role), Some(UserRole::Admin));

        let again = svc
            .ensure_default_admin("Admin", "admin@workshop.local", "admin12345")
            .await
            .unwrap();
        assert!(again.is_none());
    }

    #[tokio::test]
    async fn list_users_filters_by_role() {
        let svc = service().await;
        svc.register("Cust", "c@example.com", None, "password123").await.unwrap();
        svc.create_staff(CreateUserDto {
            name: "Mech".into(),
            email: "m@example.com".into(),
            phone: None,
            role: UserRole::Mechanic,
            password: "password123".into(),
        })
        .await
        .unwrap();

        let query = ListQuery {
            filters: vec![("role".into(), "mechanic".into())],
            ..Default::default()
        };
        let page = svc
            .list_users(UserFetchParams::from_query(&query, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].email, "m@example.com");
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let svc = service().await;
        assert!(matches!(
            svc.get_user("nope").await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
