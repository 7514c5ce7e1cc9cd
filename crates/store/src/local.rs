//! Local filesystem backend

use crate::{FileReader, FileStorage};
use maid_errors::{Error, StorageError};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Storage rooted at a directory; names are relative paths below it
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base: PathBuf,
}

impl LocalStorage {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self { base: base.into() }
    }

    /// Root directory of this storage
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base
    }

    /// Resolve a file name to its location on disk
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` for empty or absolute names and
    /// names that step outside the root.
    pub fn path(&self, name: &str) -> Result<PathBuf, Error> {
        let relative = Path::new(name);
        let valid = !name.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !valid {
            return Err(StorageError::InvalidPath {
                name: name.to_string(),
            }
            .into());
        }
        Ok(self.base.join(relative))
    }

    async fn available_name(&self, name: &str) -> Result<String, Error> {
        if !self.exists(name).await? {
            return Ok(name.to_string());
        }
        let mut suffix = 1u32;
        loop {
            let candidate = suffixed_name(name, suffix);
            if !self.exists(&candidate).await? {
                return Ok(candidate);
            }
            suffix += 1;
        }
    }
}

/// `docs/a.txt` -> `docs/a_2.txt`
fn suffixed_name(name: &str, suffix: u32) -> String {
    let path = Path::new(name);
    let stem = path.file_stem().and_then(OsStr::to_str).unwrap_or(name);
    let file_name = match path.extension().and_then(OsStr::to_str) {
        Some(ext) => format!("{stem}_{suffix}.{ext}"),
        None => format!("{stem}_{suffix}"),
    };
    match path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        Some(parent) => format!("{}/{file_name}", parent.display()),
        None => file_name,
    }
}

#[async_trait::async_trait]
impl FileStorage for LocalStorage {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<String, Error> {
        // Validate before probing the filesystem
        self.path(name)?;
        let stored_name = self.available_name(name).await?;
        let dest_path = self.path(&stored_name)?;

        let parent_dir = dest_path.parent().ok_or_else(|| StorageError::IoError {
            message: "failed to get parent directory".to_string(),
        })?;
        fs::create_dir_all(parent_dir)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, parent_dir))?;

        let temp_path = parent_dir.join(format!("{}.tmp", Uuid::new_v4()));
        if let Err(e) = fs::write(&temp_path, bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::IoError {
                message: format!("failed to write temp file: {e}"),
            }
            .into());
        }

        if let Err(e) = fs::rename(&temp_path, &dest_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::IoError {
                message: format!("failed to move temp file into storage: {e}"),
            }
            .into());
        }

        Ok(stored_name)
    }

    async fn open(&self, name: &str) -> Result<FileReader, Error> {
        let path = self.path(name)?;
        match fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::PathNotFound {
                    name: name.to_string(),
                }
                .into())
            }
            Err(e) => Err(StorageError::from_io_with_path(&e, &path).into()),
        }
    }

    async fn delete(&self, name: &str) -> Result<(), Error> {
        let path = self.path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io_with_path(&e, &path).into()),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool, Error> {
        let path = self.path(name)?;
        fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &path).into())
    }

    async fn size(&self, name: &str) -> Result<u64, Error> {
        let path = self.path(name)?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &path))?;
        Ok(metadata.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixed_name() {
        assert_eq!(suffixed_name("a.txt", 1), "a_1.txt");
        assert_eq!(suffixed_name("docs/a.txt", 2), "docs/a_2.txt");
        assert_eq!(suffixed_name("README", 1), "README_1");
        assert_eq!(suffixed_name("archive.tar.gz", 3), "archive.tar_3.gz");
    }

    #[test]
    fn test_path_rejects_escapes() {
        let storage = LocalStorage::new("/srv/files");
        assert!(storage.path("../secret").is_err());
        assert!(storage.path("/etc/passwd").is_err());
        assert!(storage.path("").is_err());
        assert!(storage.path("./a.txt").is_err());
        assert_eq!(
            storage.path("docs/a.txt").unwrap(),
            PathBuf::from("/srv/files/docs/a.txt")
        );
    }
}
