use chrono::{DateTime, Utc};

/// A status write together with its audit fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange<S> {
    pub status: S,
    pub actor_id: String,
    pub at: DateTime<Utc>,
}

impl<S> StatusChange<S> {
    pub fn now(status: S, actor_id: impl Into<String>) -> Self {
        Self {
            status,
            actor_id: actor_id.into(),
            at: Utc::now(),
        }
    }
}
