//! Which file fields are tracked for which entity types

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use maid_errors::{Error, RegistryError};
use maid_state::{EntityType, RecordManager};
use std::collections::BTreeSet;

/// Tracked field names per entity type.
///
/// Registration only ever adds names; there is no way to stop tracking a
/// field once registered.
#[derive(Debug, Default)]
pub struct FileFieldRegistry {
    entries: DashMap<EntityType, BTreeSet<String>>,
}

impl FileFieldRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `fields` to the names tracked for `entity`.
    ///
    /// Returns `true` if `entity` had no entry before this call.
    pub fn register<I, S>(&self, entity: &EntityType, fields: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into);
        match self.entries.entry(entity.clone()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().extend(fields);
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(fields.collect());
                true
            }
        }
    }

    #[must_use]
    pub fn is_registered(&self, entity: &EntityType) -> bool {
        self.entries.contains_key(entity)
    }

    #[must_use]
    pub fn is_tracked(&self, entity: &EntityType, field: &str) -> bool {
        self.entries
            .get(entity)
            .is_some_and(|fields| fields.contains(field))
    }

    /// Snapshot of the field names tracked for `entity`, sorted
    #[must_use]
    pub fn fields(&self, entity: &EntityType) -> Vec<String> {
        self.entries
            .get(entity)
            .map(|fields| fields.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Every registered entity type, sorted
    #[must_use]
    pub fn entities(&self) -> Vec<EntityType> {
        let mut entities: Vec<_> = self.entries.iter().map(|e| e.key().clone()).collect();
        entities.sort();
        entities
    }
}

/// Field names to register: `fields` as given, or every file field of the
/// entity's schema when omitted.
pub(crate) fn resolve_fields(
    manager: &RecordManager,
    entity: &EntityType,
    fields: Option<&[&str]>,
) -> Result<Vec<String>, Error> {
    if let Some(fields) = fields {
        return Ok(fields.iter().map(|field| (*field).to_string()).collect());
    }

    let schema = manager
        .schema(entity)
        .ok_or_else(|| RegistryError::UnknownEntity {
            entity: entity.to_string(),
        })?;
    Ok(schema
        .file_fields()
        .map(|def| def.name().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_registration_is_reported_once() {
        let registry = FileFieldRegistry::new();
        let entity = EntityType::from("document");

        assert!(registry.register(&entity, ["attachment"]));
        assert!(!registry.register(&entity, ["attachment"]));
        assert!(!registry.register(&entity, Vec::<String>::new()));
        assert_eq!(registry.fields(&entity), vec!["attachment"]);
    }

    #[test]
    fn registrations_accumulate() {
        let registry = FileFieldRegistry::new();
        let entity = EntityType::from("document");

        registry.register(&entity, ["cover"]);
        registry.register(&entity, ["attachment", "cover"]);

        assert_eq!(registry.fields(&entity), vec!["attachment", "cover"]);
        assert!(registry.is_tracked(&entity, "cover"));
        assert!(!registry.is_tracked(&entity, "title"));
        assert!(!registry.is_tracked(&EntityType::from("avatar"), "cover"));
    }

    #[test]
    fn empty_registration_still_creates_entry() {
        let registry = FileFieldRegistry::new();
        let entity = EntityType::from("avatar");

        assert!(registry.register(&entity, Vec::<&str>::new()));
        assert!(registry.is_registered(&entity));
        assert!(registry.fields(&entity).is_empty());
        assert_eq!(registry.entities(), vec![entity]);
    }
}
