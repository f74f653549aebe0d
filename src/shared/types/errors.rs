use thiserror::Error;

/// Reason a requested status change was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionRejection {
    #[error("cannot update {entity} with status {status}: status is final")]
    TerminalState { entity: &'static str, status: String },

    #[error("role {role} is not allowed to move {entity} from {from} to {to}")]
    RoleNotAllowed {
        entity: &'static str,
        role: String,
        from: String,
        to: String,
    },

    #[error("no transitions from {entity} status {status}")]
    NoTransitions { entity: &'static str, status: String },

    #[error("{action}: {entity} has status {status}")]
    NotEligible {
        entity: &'static str,
        status: String,
        action: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] TransitionRejection),

    #[error("Invalid orderBy column: {0}")]
    InvalidSortColumn(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Well-formed request naming a row that cannot take part in the action.
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            field: "id",
            value: id.into(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

/// Errors raised while bringing the service up.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
