//! Entity schemas: which fields exist, which hold files, and their defaults

use crate::models::{EntityType, FieldValue, Record};
use maid_store::{FieldFile, FileStorage};
use std::sync::Arc;

/// What a field holds
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    /// Names of files kept in `storage`
    File { storage: Arc<dyn FileStorage> },
}

/// One field of an entity schema
#[derive(Debug, Clone)]
pub struct FieldDef {
    name: String,
    kind: FieldKind,
    default: Option<String>,
}

impl FieldDef {
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text,
            default: None,
        }
    }

    #[must_use]
    pub fn file(name: impl Into<String>, storage: Arc<dyn FileStorage>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::File { storage },
            default: None,
        }
    }

    /// Static default assigned to new records
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[must_use]
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self.kind, FieldKind::File { .. })
    }

    /// Backend of a file field
    #[must_use]
    pub fn storage(&self) -> Option<&Arc<dyn FileStorage>> {
        match &self.kind {
            FieldKind::File { storage } => Some(storage),
            FieldKind::Text => None,
        }
    }

    fn value_from(&self, stored: Option<String>) -> FieldValue {
        match (&self.kind, stored) {
            (_, None) => FieldValue::Null,
            (FieldKind::File { .. }, Some(name)) => FieldValue::File(FieldFile::new(name)),
            (FieldKind::Text, Some(text)) => FieldValue::Text(text),
        }
    }
}

/// Field layout of one entity type
#[derive(Debug, Clone)]
pub struct EntitySchema {
    entity: EntityType,
    fields: Vec<FieldDef>,
}

impl EntitySchema {
    #[must_use]
    pub fn new(entity: impl Into<EntityType>) -> Self {
        Self {
            entity: entity.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field, replacing any earlier field of the same name
    #[must_use]
    pub fn field(mut self, def: FieldDef) -> Self {
        self.fields.retain(|existing| existing.name != def.name);
        self.fields.push(def);
        self
    }

    #[must_use]
    pub fn entity(&self) -> &EntityType {
        &self.entity
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|def| def.name == name)
    }

    pub fn file_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|def| def.is_file())
    }

    /// A fresh, unsaved record with every default applied
    #[must_use]
    pub fn new_record(&self) -> Record {
        let mut record = Record::new(self.entity.clone());
        for def in &self.fields {
            if let Some(default) = &def.default {
                record.set(def.name.clone(), def.value_from(Some(default.clone())));
            }
        }
        record
    }

    /// Re-type file field values that were set as plain text, so a name
    /// assigned with `set_text` reads back as a file reference
    pub fn coerce_file_values(&self, record: &mut Record) {
        for def in self.file_fields() {
            let Some(name) = record.text(def.name()).map(str::to_string) else {
                continue;
            };
            record.set(def.name(), def.value_from(Some(name)));
        }
    }

    /// Turn a column value back into a field value. Columns without a
    /// matching field are read as text.
    #[must_use]
    pub fn value_from_stored(&self, field: &str, stored: Option<String>) -> FieldValue {
        match self.get(field) {
            Some(def) => def.value_from(stored),
            None => stored.map_or(FieldValue::Null, FieldValue::Text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maid_store::LocalStorage;

    fn schema() -> EntitySchema {
        let storage: Arc<dyn FileStorage> = Arc::new(LocalStorage::new("/srv/files"));
        EntitySchema::new("document")
            .field(FieldDef::text("title"))
            .field(FieldDef::file("attachment", storage.clone()).with_default("blank.txt"))
            .field(FieldDef::file("cover", storage))
    }

    #[test]
    fn test_file_fields() {
        let schema = schema();
        let names: Vec<_> = schema.file_fields().map(FieldDef::name).collect();
        assert_eq!(names, vec!["attachment", "cover"]);
    }

    #[test]
    fn test_new_record_applies_defaults() {
        let record = schema().new_record();
        assert_eq!(record.file_name("attachment"), Some("blank.txt"));
        assert_eq!(record.get("cover"), None);
        assert_eq!(record.id(), None);
    }

    #[test]
    fn test_value_from_stored() {
        let schema = schema();
        assert_eq!(
            schema.value_from_stored("attachment", Some("a.txt".into())),
            FieldValue::File(FieldFile::new("a.txt"))
        );
        assert_eq!(
            schema.value_from_stored("title", Some("a.txt".into())),
            FieldValue::Text("a.txt".into())
        );
        assert_eq!(
            schema.value_from_stored("dropped", Some("x".into())),
            FieldValue::Text("x".into())
        );
        assert_eq!(schema.value_from_stored("cover", None), FieldValue::Null);
    }

    #[test]
    fn test_coerce_file_values() {
        let schema = schema();
        let mut record = Record::new("document")
            .with_text("title", "notes.txt")
            .with_text("attachment", "a.txt")
            .with_text("dropped", "b.txt");

        schema.coerce_file_values(&mut record);
        assert_eq!(record.file_name("attachment"), Some("a.txt"));
        assert_eq!(record.text("title"), Some("notes.txt"));
        assert_eq!(record.text("dropped"), Some("b.txt"));
    }

    #[test]
    fn test_field_replaces_same_name() {
        let schema = schema().field(FieldDef::text("attachment"));
        assert_eq!(schema.fields().len(), 3);
        assert!(!schema.get("attachment").unwrap().is_file());
    }
}
