use serde::{Deserialize, Serialize};

pub mod cleanup;
pub mod record;

pub use cleanup::*;
pub use record::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// Record persistence events (saves, deletes)
    Record(RecordEvent),

    /// Orphan file cleanup decisions
    Cleanup(CleanupEvent),
}

impl AppEvent {
    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::Cleanup(CleanupEvent::PreviousVersionMissing { .. }) => Level::WARN,

            Self::Cleanup(CleanupEvent::FileDeleted { .. }) => Level::INFO,

            Self::Record(_) | Self::Cleanup(CleanupEvent::FileRetained { .. }) => Level::DEBUG,

            Self::Cleanup(CleanupEvent::FieldSkipped { .. }) => Level::TRACE,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::Record(_) => "maid::events::record",
            Self::Cleanup(_) => "maid::events::cleanup",
        }
    }
}
