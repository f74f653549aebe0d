use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{User, UserFilter, UserSort};
use crate::domain::query::FetchParams;
use crate::domain::DomainResult;

pub type UserFetchParams = FetchParams<UserFilter, UserSort>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn fetch(&self, params: &UserFetchParams) -> DomainResult<(Vec<User>, u64)>;
    async fn update(&self, user: &User) -> DomainResult<()>;
    async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()>;
    async fn count(&self) -> DomainResult<u64>;
}

/// Logged-out JWTs, kept by hash until their natural expiry.
#[async_trait]
pub trait RevokedTokenRepository: Send + Sync {
    async fn revoke(&self, token_hash: &str, expires_at: DateTime<Utc>) -> DomainResult<()>;
    async fn is_revoked(&self, token_hash: &str) -> DomainResult<bool>;
    /// Drop entries whose token has expired anyway. Returns rows removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<u64>;
}
