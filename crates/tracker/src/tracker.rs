//! The lifecycle hook that removes orphaned files

use crate::deleter::delete_if_orphaned;
use crate::registry::{resolve_fields, FileFieldRegistry};
use maid_config::{MissingPreviousPolicy, TrackerConfig};
use maid_errors::{Error, StateError};
use maid_events::{CleanupEvent, EventEmitter, EventSender};
use maid_state::{
    EntityType, FieldValue, LifecycleHook, Record, RecordManager, UpdateContext,
};
use std::sync::Arc;

/// Deletes stored files once no record of their entity type uses them.
///
/// Build one at start-up, wrap it in an [`Arc`] and register the entity
/// types to watch. The tracker subscribes itself to a [`RecordManager`] the
/// first time an entity type is registered with it.
#[derive(Debug, Default)]
pub struct OrphanFileTracker {
    registry: FileFieldRegistry,
    missing_previous: MissingPreviousPolicy,
    tx: Option<EventSender>,
}

impl OrphanFileTracker {
    #[must_use]
    pub fn new(missing_previous: MissingPreviousPolicy) -> Self {
        Self {
            registry: FileFieldRegistry::new(),
            missing_previous,
            tx: None,
        }
    }

    /// Emit cleanup events to `tx`
    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Build a tracker and register every `[[tracker.tracked]]` entry
    ///
    /// # Errors
    ///
    /// Returns an error if an entry omits its fields and names an entity
    /// without a schema.
    pub fn from_config(
        config: &TrackerConfig,
        manager: &mut RecordManager,
    ) -> Result<Arc<Self>, Error> {
        let tracker = Arc::new(Self::new(config.missing_previous));
        tracker.register_config(config, manager)?;
        Ok(tracker)
    }

    /// Register every `[[tracker.tracked]]` entry with this tracker
    ///
    /// # Errors
    ///
    /// Returns an error if an entry omits its fields and names an entity
    /// without a schema.
    pub fn register_config(
        self: &Arc<Self>,
        config: &TrackerConfig,
        manager: &mut RecordManager,
    ) -> Result<(), Error> {
        for tracked in &config.tracked {
            let fields: Option<Vec<&str>> = tracked
                .fields
                .as_ref()
                .map(|fields| fields.iter().map(String::as_str).collect());
            self.register(manager, tracked.entity.as_str(), fields.as_deref())?;
        }
        Ok(())
    }

    /// Track `fields` of `entity`, or every file field of its schema when
    /// `fields` is `None`.
    ///
    /// Repeated calls add to the tracked set. The tracker is connected to
    /// `manager` on the first call for an entity type with that manager, and
    /// the tracked set is shared by every manager it is connected to.
    /// Returns `true` when this call connected it.
    ///
    /// # Errors
    ///
    /// Returns an error if `fields` is `None` and the entity has no schema.
    pub fn register(
        self: &Arc<Self>,
        manager: &mut RecordManager,
        entity: impl Into<EntityType>,
        fields: Option<&[&str]>,
    ) -> Result<bool, Error> {
        let entity = entity.into();
        let fields = resolve_fields(manager, &entity, fields)?;

        self.registry.register(&entity, fields);
        let hook: Arc<dyn LifecycleHook> = self.clone();
        let connected = manager.connect(&entity, hook);
        if connected {
            tracing::debug!(entity = %entity, "orphan file tracking enabled");
        }
        Ok(connected)
    }

    #[must_use]
    pub fn registry(&self) -> &FileFieldRegistry {
        &self.registry
    }

    #[must_use]
    pub fn missing_previous(&self) -> MissingPreviousPolicy {
        self.missing_previous
    }
}

impl EventEmitter for OrphanFileTracker {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

#[async_trait::async_trait]
impl LifecycleHook for OrphanFileTracker {
    async fn pre_update(
        &self,
        manager: &RecordManager,
        record: &Record,
    ) -> Result<UpdateContext, Error> {
        let Some(id) = record.id() else {
            return Ok(UpdateContext::empty());
        };

        if let Some(previous) = manager.get(record.entity(), id).await? {
            return Ok(UpdateContext::with_previous(previous));
        }

        match self.missing_previous {
            MissingPreviousPolicy::Fail => Err(StateError::RecordNotFound {
                entity: record.entity().to_string(),
                id,
            }
            .into()),
            MissingPreviousPolicy::Ignore => {
                tracing::warn!(
                    entity = %record.entity(),
                    record_id = id,
                    "no persisted version to compare against, skipping file cleanup"
                );
                self.emit_cleanup(CleanupEvent::PreviousVersionMissing {
                    entity: record.entity().to_string(),
                    record_id: id,
                });
                Ok(UpdateContext::empty())
            }
        }
    }

    async fn post_update(
        &self,
        manager: &RecordManager,
        record: &Record,
        context: UpdateContext,
    ) -> Result<(), Error> {
        let Some(mut previous) = context.take_previous() else {
            return Ok(());
        };

        for field in self.registry.fields(record.entity()) {
            if stored_value(&previous, &field) != stored_value(record, &field) {
                delete_if_orphaned(manager, &mut previous, &field, self).await?;
            }
        }
        Ok(())
    }

    async fn post_delete(&self, manager: &RecordManager, record: &mut Record) -> Result<(), Error> {
        for field in self.registry.fields(record.entity()) {
            delete_if_orphaned(manager, record, &field, self).await?;
        }
        Ok(())
    }
}

/// A field as it is persisted; an absent field reads as `NULL`
fn stored_value(record: &Record, field: &str) -> Option<String> {
    record.get(field).and_then(FieldValue::to_stored)
}
