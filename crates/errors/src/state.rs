//! Record persistence error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StateError {
    #[error("database error: {message}")]
    DatabaseError { message: String },

    #[error("migration failed: {message}")]
    MigrationFailed { message: String },

    #[error("record not found: {entity}#{id}")]
    RecordNotFound { entity: String, id: i64 },

    #[error("no schema registered for entity `{entity}`")]
    UnknownEntity { entity: String },

    #[error("record of `{entity}` has not been saved yet")]
    MissingIdentity { entity: String },
}

impl UserFacingError for StateError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownEntity { .. } => {
                Some("Register the entity schema with the record manager at start-up.")
            }
            Self::RecordNotFound { .. } => Some(
                "The record vanished between load and save; set `tracker.missing_previous = \"ignore\"` to tolerate this.",
            ),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::DatabaseError { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::DatabaseError { .. } => "state.database",
            Self::MigrationFailed { .. } => "state.migration_failed",
            Self::RecordNotFound { .. } => "state.record_not_found",
            Self::UnknownEntity { .. } => "state.unknown_entity",
            Self::MissingIdentity { .. } => "state.missing_identity",
        };
        Some(code)
    }
}
