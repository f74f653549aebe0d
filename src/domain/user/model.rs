use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::query::{allow_list, FilterField, SortField};
use crate::shared::errors::DomainError;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Cashier,
    Mechanic,
    #[default]
    Customer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Cashier => "cashier",
            Self::Mechanic => "mechanic",
            Self::Customer => "customer",
        }
    }

    /// Front-desk roles allowed to run bookings and work orders.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Cashier)
    }
}

impl std::str::FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "cashier" => Ok(Self::Cashier),
            "mechanic" => Ok(Self::Mechanic),
            "customer" => Ok(Self::Customer),
            other => Err(DomainError::Validation(format!("unknown role: {}", other))),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: UserRole) -> Self {
        Self { id: id.into(), role }
    }

    pub fn require_staff(&self) -> Result<(), DomainError> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "role {} cannot perform this action",
                self.role
            )))
        }
    }

    /// Admins and the owner pass; everyone else is forbidden.
    pub fn require_owner_or_admin(&self, owner_id: &str) -> Result<(), DomainError> {
        if self.role == UserRole::Admin || self.id == owner_id {
            Ok(())
        } else {
            Err(DomainError::Forbidden("not the owner of this record".into()))
        }
    }
}

allow_list!(UserFilter { Role => "role", IsActive => "is_active" });
allow_list!(UserSort {
    Name => "name",
    Email => "email",
    CreatedAt => "created_at",
    UpdatedAt => "updated_at",
});

impl FilterField for UserFilter {
    fn from_key(key: &str) -> Option<Self> {
        Self::lookup(key)
    }
}

impl SortField for UserSort {
    fn from_column(column: &str) -> Option<Self> {
        Self::lookup(column)
    }

    fn default_column() -> Self {
        Self::CreatedAt
    }
}
