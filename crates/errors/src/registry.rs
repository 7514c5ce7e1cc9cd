//! File field registration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("cannot resolve file fields of unknown entity `{entity}`")]
    UnknownEntity { entity: String },
}

impl UserFacingError for RegistryError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownEntity { .. } => Some(
                "Register the entity schema before tracking it, or name the fields explicitly.",
            ),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Self::UnknownEntity { .. } => Some("registry.unknown_entity"),
        }
    }
}
