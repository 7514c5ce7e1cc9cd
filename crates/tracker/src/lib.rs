#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Orphan file cleanup for maid
//!
//! An [`OrphanFileTracker`] subscribes to the lifecycle of registered entity
//! types. When a record is deleted, or a tracked file field is pointed at a
//! different file, the file it used to hold is removed from storage unless it
//! is the field's default or another record of the same type still uses it.

mod deleter;
mod registry;
mod tracker;

pub use deleter::{delete_if_orphaned, CleanupOutcome};
pub use maid_events::{RetainReason, SkipReason};
pub use registry::FileFieldRegistry;
pub use tracker::OrphanFileTracker;

use maid_errors::Error;
use maid_state::{EntityType, RecordManager};
use std::sync::Arc;

/// Track `fields` of `entity` (every file field when `None`) with `tracker`
///
/// Returns `true` when this call subscribed the tracker to the entity on
/// `manager`.
///
/// # Errors
///
/// Returns an error if `fields` is omitted and the entity has no schema.
pub fn register_file_fields(
    manager: &mut RecordManager,
    tracker: &Arc<OrphanFileTracker>,
    entity: impl Into<EntityType>,
    fields: Option<&[&str]>,
) -> Result<bool, Error> {
    tracker.register(manager, entity, fields)
}
