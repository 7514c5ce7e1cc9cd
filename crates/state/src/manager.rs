//! Record manager: persistence plus lifecycle hook dispatch

use crate::hooks::LifecycleHook;
use crate::models::{EntityType, Record, RecordId, StoredRecord};
use crate::queries;
use crate::schema::EntitySchema;
use maid_config::Config;
use maid_errors::{Error, StateError};
use maid_events::{EventEmitter, EventSender, RecordEvent};
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Saves and deletes records, running the hooks connected for their entity
/// type around each write.
///
/// Clones share the pool. Schemas and hooks are copied as they are at clone
/// time.
#[derive(Clone)]
pub struct RecordManager {
    pool: Pool<Sqlite>,
    schemas: HashMap<EntityType, EntitySchema>,
    hooks: HashMap<EntityType, Vec<Arc<dyn LifecycleHook>>>,
    tx: Option<EventSender>,
}

impl RecordManager {
    /// Create a new record manager with database setup
    ///
    /// # Errors
    ///
    /// Returns an error if database setup or migrations fail.
    pub async fn new(db_path: &Path) -> Result<Self, Error> {
        let pool = crate::create_pool(db_path).await?;
        crate::run_migrations(&pool).await?;
        Ok(Self::with_pool(pool))
    }

    /// Open the database named by the configuration, creating its directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or database setup fails.
    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        let db_path = config.db_path();
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io_with_path(&e, parent))?;
        }
        let pool = crate::create_pool_with_config(&db_path, &config.state).await?;
        crate::run_migrations(&pool).await?;
        Ok(Self::with_pool(pool))
    }

    /// Create a record manager over an existing, migrated pool
    #[must_use]
    pub fn with_pool(pool: Pool<Sqlite>) -> Self {
        Self {
            pool,
            schemas: HashMap::new(),
            hooks: HashMap::new(),
            tx: None,
        }
    }

    /// Emit record events to `tx`
    #[must_use]
    pub fn with_events(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Declare an entity type; replaces an earlier schema of the same type
    pub fn register_schema(&mut self, schema: EntitySchema) {
        self.schemas.insert(schema.entity().clone(), schema);
    }

    #[must_use]
    pub fn schema(&self, entity: &EntityType) -> Option<&EntitySchema> {
        self.schemas.get(entity)
    }

    fn require_schema(&self, entity: &EntityType) -> Result<&EntitySchema, Error> {
        self.schema(entity).ok_or_else(|| {
            StateError::UnknownEntity {
                entity: entity.to_string(),
            }
            .into()
        })
    }

    /// Subscribe `hook` to saves and deletes of `entity` only.
    ///
    /// Connecting the same hook instance twice for an entity is a no-op;
    /// returns whether the hook was added.
    pub fn connect(&mut self, entity: &EntityType, hook: Arc<dyn LifecycleHook>) -> bool {
        let hooks = self.hooks.entry(entity.clone()).or_default();
        if hooks
            .iter()
            .any(|existing| std::ptr::addr_eq(Arc::as_ptr(existing), Arc::as_ptr(&hook)))
        {
            return false;
        }
        hooks.push(hook);
        true
    }

    /// Number of hooks subscribed for `entity`
    #[must_use]
    pub fn hook_count(&self, entity: &EntityType) -> usize {
        self.hooks.get(entity).map_or(0, Vec::len)
    }

    fn hooks_for(&self, entity: &EntityType) -> &[Arc<dyn LifecycleHook>] {
        self.hooks.get(entity).map_or(&[][..], Vec::as_slice)
    }

    /// Fetch the persisted version of a record
    ///
    /// # Errors
    ///
    /// Returns an error if the entity has no schema or the query fails.
    pub async fn get(&self, entity: &EntityType, id: RecordId) -> Result<Option<Record>, Error> {
        let schema = self.require_schema(entity)?;
        let mut tx = self.pool.begin().await?;
        let stored = queries::fetch_records(&mut tx, entity, Some(id)).await?;
        tx.commit().await?;
        Ok(stored.into_iter().next().map(|row| hydrate(schema, row)))
    }

    /// Every persisted record of an entity type, ordered by identity
    ///
    /// # Errors
    ///
    /// Returns an error if the entity has no schema or the query fails.
    pub async fn all(&self, entity: &EntityType) -> Result<Vec<Record>, Error> {
        let schema = self.require_schema(entity)?;
        let mut tx = self.pool.begin().await?;
        let stored = queries::fetch_records(&mut tx, entity, None).await?;
        tx.commit().await?;
        Ok(stored.into_iter().map(|row| hydrate(schema, row)).collect())
    }

    /// Whether a record of `entity` other than `exclude` holds `value` in `field`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn is_referenced_elsewhere(
        &self,
        entity: &EntityType,
        field: &str,
        value: &str,
        exclude: Option<RecordId>,
    ) -> Result<bool, Error> {
        let mut tx = self.pool.begin().await?;
        let referenced =
            queries::value_referenced_elsewhere(&mut tx, entity, field, value, exclude).await?;
        tx.commit().await?;
        Ok(referenced)
    }

    /// Insert or update a record.
    ///
    /// Every connected hook sees `pre_update` before the write and
    /// `post_update` after the commit, in connection order. A record whose
    /// identity no longer matches a row is re-inserted under that identity.
    /// File fields holding plain text are re-typed to file references first.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity has no schema, a hook fails, or the
    /// write fails. A failing `pre_update` aborts the save before anything
    /// is written.
    pub async fn save(&self, record: &mut Record) -> Result<(), Error> {
        let entity = record.entity().clone();
        self.require_schema(&entity)?.coerce_file_values(record);
        let hooks = self.hooks_for(&entity);

        let mut contexts = Vec::with_capacity(hooks.len());
        for hook in hooks {
            contexts.push(hook.pre_update(self, record).await?);
        }

        let values = record.stored_values();
        let mut tx = self.pool.begin().await?;
        let (id, created) = match record.id() {
            None => (queries::insert_record(&mut tx, &entity).await?, true),
            Some(id) => {
                if queries::touch_record(&mut tx, &entity, id).await? == 0 {
                    queries::insert_record_with_id(&mut tx, id, &entity).await?;
                    (id, true)
                } else {
                    (id, false)
                }
            }
        };
        queries::replace_fields(&mut tx, &entity, id, &values).await?;
        tx.commit().await?;
        record.set_id(Some(id));

        self.emit_record(RecordEvent::Saved {
            entity: entity.to_string(),
            record_id: id,
            created,
        });

        for (hook, context) in hooks.iter().zip(contexts) {
            hook.post_update(self, record, context).await?;
        }

        Ok(())
    }

    /// Delete a saved record, run `post_delete` hooks, then drop its identity
    ///
    /// # Errors
    ///
    /// Returns an error if the record was never saved, the delete fails, or a
    /// hook fails.
    pub async fn delete(&self, record: &mut Record) -> Result<(), Error> {
        let entity = record.entity().clone();
        let id = record.id().ok_or_else(|| StateError::MissingIdentity {
            entity: entity.to_string(),
        })?;
        if let Some(schema) = self.schema(&entity) {
            schema.coerce_file_values(record);
        }

        let mut tx = self.pool.begin().await?;
        queries::delete_record(&mut tx, &entity, id).await?;
        tx.commit().await?;

        self.emit_record(RecordEvent::Deleted {
            entity: entity.to_string(),
            record_id: id,
        });

        for hook in self.hooks_for(&entity) {
            hook.post_delete(self, record).await?;
        }

        record.set_id(None);
        Ok(())
    }
}

impl EventEmitter for RecordManager {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl std::fmt::Debug for RecordManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordManager")
            .field("schemas", &self.schemas.keys().collect::<Vec<_>>())
            .field(
                "hooks",
                &self
                    .hooks
                    .iter()
                    .map(|(entity, hooks)| (entity, hooks.len()))
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

fn hydrate(schema: &EntitySchema, stored: StoredRecord) -> Record {
    let mut record = Record::new(schema.entity().clone());
    record.set_id(Some(stored.id));
    for (field, value) in stored.fields {
        let value = schema.value_from_stored(&field, value);
        record.set(field, value);
    }
    record
}
