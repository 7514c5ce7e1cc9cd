use serde::{Deserialize, Serialize};

/// Why a superseded file was kept in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetainReason {
    /// The name is the field's configured default
    Default,
    /// Another record of the same entity still points at it
    Shared,
}

/// Why a tracked field was not inspected at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The entity schema has no field with that name
    UnknownField,
    /// The field exists but does not hold files
    NotAFileField,
}

/// Orphan file cleanup decisions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CleanupEvent {
    /// The file was removed from its storage backend
    FileDeleted {
        entity: String,
        record_id: Option<i64>,
        field: String,
        name: String,
    },

    /// The file was kept and its handle released
    FileRetained {
        entity: String,
        record_id: Option<i64>,
        field: String,
        name: String,
        reason: RetainReason,
    },

    /// The tracked field could not be resolved to a file field
    FieldSkipped {
        entity: String,
        field: String,
        reason: SkipReason,
    },

    /// An update found no persisted previous version to compare against
    PreviousVersionMissing { entity: String, record_id: i64 },
}
