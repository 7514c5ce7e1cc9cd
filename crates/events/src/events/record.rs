use serde::{Deserialize, Serialize};

/// Record persistence notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RecordEvent {
    /// A record was written; `created` is true for the first write
    Saved {
        entity: String,
        record_id: i64,
        created: bool,
    },

    /// A record row was removed
    Deleted { entity: String, record_id: i64 },
}
