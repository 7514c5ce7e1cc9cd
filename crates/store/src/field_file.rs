//! File references held by record fields

use crate::{FileReader, FileStorage};
use maid_errors::Error;

/// A stored file as seen from a record field.
///
/// Equality and cloning only consider the name; a clone starts closed.
pub struct FieldFile {
    name: String,
    handle: Option<FileReader>,
}

impl FieldFile {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: None,
        }
    }

    /// Storage name of the file
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// An empty name means the field holds no file
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Open the file for reading, reusing the handle if already open
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot open the file.
    pub async fn open(&mut self, storage: &dyn FileStorage) -> Result<&mut FileReader, Error> {
        if self.handle.is_none() {
            let reader = storage.open(&self.name).await?;
            self.handle = Some(reader);
        }
        self.handle
            .as_mut()
            .ok_or_else(|| Error::internal("file handle vanished after open"))
    }

    /// Release the open handle, if any
    pub fn close(&mut self) {
        self.handle = None;
    }

    /// Close the handle and remove the file from `storage`
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to delete the file.
    pub async fn delete(&mut self, storage: &dyn FileStorage) -> Result<(), Error> {
        self.close();
        storage.delete(&self.name).await
    }
}

impl Clone for FieldFile {
    fn clone(&self) -> Self {
        Self::new(self.name.clone())
    }
}

impl PartialEq for FieldFile {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for FieldFile {}

impl std::fmt::Debug for FieldFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldFile")
            .field("name", &self.name)
            .field("open", &self.is_open())
            .finish()
    }
}
