//! In-memory record types

use maid_store::FieldFile;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Database identity of a saved record
pub type RecordId = i64;

/// Name of a record kind, e.g. `document`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityType(String);

impl EntityType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityType {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityType {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for EntityType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Value held by one field of a record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Text(String),
    File(FieldFile),
}

impl FieldValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_file(&self) -> Option<&FieldFile> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_file_mut(&mut self) -> Option<&mut FieldFile> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }

    /// Name of the referenced file, `None` for non-files and empty names
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.as_file()
            .filter(|file| !file.is_empty())
            .map(FieldFile::name)
    }

    /// Column representation
    #[must_use]
    pub fn to_stored(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(text) => Some(text.clone()),
            Self::File(file) if file.is_empty() => None,
            Self::File(file) => Some(file.name().to_string()),
        }
    }
}

/// A record of some entity type, saved or not
#[derive(Debug, Clone)]
pub struct Record {
    entity: EntityType,
    id: Option<RecordId>,
    values: BTreeMap<String, FieldValue>,
}

impl Record {
    #[must_use]
    pub fn new(entity: impl Into<EntityType>) -> Self {
        Self {
            entity: entity.into(),
            id: None,
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_text(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_text(field, value);
        self
    }

    #[must_use]
    pub fn with_file(mut self, field: impl Into<String>, name: impl Into<String>) -> Self {
        self.set_file(field, name);
        self
    }

    #[must_use]
    pub fn entity(&self) -> &EntityType {
        &self.entity
    }

    /// Identity, `None` until the record is first saved
    #[must_use]
    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: Option<RecordId>) {
        self.id = id;
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut FieldValue> {
        self.values.get_mut(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.values.insert(field.into(), value);
    }

    pub fn set_text(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.set(field, FieldValue::Text(value.into()));
    }

    pub fn set_file(&mut self, field: impl Into<String>, name: impl Into<String>) {
        self.set(field, FieldValue::File(FieldFile::new(name)));
    }

    /// Null out a field in memory
    pub fn clear(&mut self, field: &str) {
        if let Some(value) = self.values.get_mut(field) {
            *value = FieldValue::Null;
        }
    }

    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    #[must_use]
    pub fn file(&self, field: &str) -> Option<&FieldFile> {
        self.get(field).and_then(FieldValue::as_file)
    }

    pub fn file_mut(&mut self, field: &str) -> Option<&mut FieldFile> {
        self.get_mut(field).and_then(FieldValue::as_file_mut)
    }

    /// Name of the file held by `field`, if any
    #[must_use]
    pub fn file_name(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::file_name)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(field, value)| (field.as_str(), value))
    }

    pub(crate) fn stored_values(&self) -> Vec<(String, Option<String>)> {
        self.values
            .iter()
            .map(|(field, value)| (field.clone(), value.to_stored()))
            .collect()
    }
}

/// A persisted record as read back from the database
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub fields: Vec<(String, Option<String>)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_ignores_empty_and_text() {
        let record = Record::new("document")
            .with_file("attachment", "a.txt")
            .with_file("empty", "")
            .with_text("title", "a.txt");

        assert_eq!(record.file_name("attachment"), Some("a.txt"));
        assert_eq!(record.file_name("empty"), None);
        assert_eq!(record.file_name("title"), None);
        assert_eq!(record.file_name("missing"), None);
    }

    #[test]
    fn test_stored_values() {
        let mut record = Record::new("document")
            .with_file("attachment", "a.txt")
            .with_text("title", "Report");
        record.set("cover", FieldValue::Null);

        assert_eq!(
            record.stored_values(),
            vec![
                ("attachment".to_string(), Some("a.txt".to_string())),
                ("cover".to_string(), None),
                ("title".to_string(), Some("Report".to_string())),
            ]
        );

        record.clear("attachment");
        assert_eq!(record.get("attachment"), Some(&FieldValue::Null));
    }
}
