//! Lifecycle hooks run by [`RecordManager`] around saves and deletes

use crate::manager::RecordManager;
use crate::models::Record;
use maid_errors::Error;

/// State handed from a hook's `pre_update` to its own `post_update`.
///
/// It travels by value through [`RecordManager::save`]; if the save fails in
/// between, it is simply dropped.
#[derive(Debug, Default)]
pub struct UpdateContext {
    previous: Option<Record>,
}

impl UpdateContext {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Carry the version of the record that was persisted before this save
    #[must_use]
    pub fn with_previous(previous: Record) -> Self {
        Self {
            previous: Some(previous),
        }
    }

    #[must_use]
    pub fn previous(&self) -> Option<&Record> {
        self.previous.as_ref()
    }

    #[must_use]
    pub fn take_previous(self) -> Option<Record> {
        self.previous
    }
}

/// Subscriber for one entity type's lifecycle, see [`RecordManager::connect`]
#[async_trait::async_trait]
pub trait LifecycleHook: Send + Sync {
    /// Runs before a record is written, including its first write
    async fn pre_update(
        &self,
        _manager: &RecordManager,
        _record: &Record,
    ) -> Result<UpdateContext, Error> {
        Ok(UpdateContext::empty())
    }

    /// Runs after the write committed, with the context from `pre_update`
    async fn post_update(
        &self,
        _manager: &RecordManager,
        _record: &Record,
        _context: UpdateContext,
    ) -> Result<(), Error> {
        Ok(())
    }

    /// Runs after the row is gone; the record still carries its identity
    async fn post_delete(&self, _manager: &RecordManager, _record: &mut Record) -> Result<(), Error> {
        Ok(())
    }
}
