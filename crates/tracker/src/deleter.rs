//! Deciding whether a file left behind by a record can be removed

use maid_errors::Error;
use maid_events::{CleanupEvent, EventEmitter, RetainReason, SkipReason};
use maid_state::{Record, RecordManager};
use std::sync::Arc;

/// What [`delete_if_orphaned`] did with one field of one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The field is not a file field of the entity
    Skipped(SkipReason),
    /// The field holds no file
    NoFile,
    /// The file was kept and its handle closed
    Retained(RetainReason),
    /// The file was removed from storage and the field cleared in memory
    Deleted,
}

/// Remove the file held by `field` of `record` if nothing else needs it.
///
/// Checks run in order: the field must be a file field of the entity's
/// schema, it must hold a file, the file must not be the field's default, and
/// no other persisted record of the entity may hold the same name. Only then
/// is the file deleted from storage. The record itself is never saved here.
///
/// # Errors
///
/// Returns an error if the reference query or the storage delete fails.
pub async fn delete_if_orphaned<E>(
    manager: &RecordManager,
    record: &mut Record,
    field: &str,
    events: &E,
) -> Result<CleanupOutcome, Error>
where
    E: EventEmitter + Sync,
{
    let entity = record.entity().clone();
    let record_id = record.id();

    let def = manager.schema(&entity).and_then(|schema| schema.get(field));
    let Some(def) = def else {
        return Ok(skip(events, &entity.to_string(), field, SkipReason::UnknownField));
    };
    let Some(storage) = def.storage().map(Arc::clone) else {
        return Ok(skip(events, &entity.to_string(), field, SkipReason::NotAFileField));
    };

    let Some(name) = record.file_name(field).map(str::to_string) else {
        return Ok(CleanupOutcome::NoFile);
    };

    let retain = if def.default() == Some(name.as_str()) {
        Some(RetainReason::Default)
    } else if manager
        .is_referenced_elsewhere(&entity, field, &name, record_id)
        .await?
    {
        Some(RetainReason::Shared)
    } else {
        None
    };

    if let Some(reason) = retain {
        if let Some(file) = record.file_mut(field) {
            file.close();
        }
        events.emit_cleanup(CleanupEvent::FileRetained {
            entity: entity.to_string(),
            record_id,
            field: field.to_string(),
            name,
            reason,
        });
        return Ok(CleanupOutcome::Retained(reason));
    }

    if let Some(file) = record.file_mut(field) {
        file.delete(storage.as_ref()).await?;
    }
    record.clear(field);

    events.emit_cleanup(CleanupEvent::FileDeleted {
        entity: entity.to_string(),
        record_id,
        field: field.to_string(),
        name,
    });
    Ok(CleanupOutcome::Deleted)
}

fn skip<E>(events: &E, entity: &str, field: &str, reason: SkipReason) -> CleanupOutcome
where
    E: EventEmitter,
{
    events.emit_cleanup(CleanupEvent::FieldSkipped {
        entity: entity.to_string(),
        field: field.to_string(),
        reason,
    });
    CleanupOutcome::Skipped(reason)
}
