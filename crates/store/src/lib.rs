#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! File storage for maid
//!
//! Records never hold file contents, only names. A name is resolved against a
//! [`FileStorage`] backend, which owns the bytes. [`FieldFile`] is the value a
//! file field holds on an in-memory record: the name plus an optional open
//! read handle.

mod field_file;
mod local;

pub use field_file::FieldFile;
pub use local::LocalStorage;

use maid_errors::Error;
use tokio::io::AsyncRead;

/// Open read handle returned by [`FileStorage::open`]
pub type FileReader = Box<dyn AsyncRead + Send + Sync + Unpin>;

/// Backend trait for named file storage
#[async_trait::async_trait]
pub trait FileStorage: Send + Sync + std::fmt::Debug {
    /// Store `bytes` under `name` or, when taken, the next free variant of it.
    /// Returns the name actually used.
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<String, Error>;

    /// Open a stored file for reading
    async fn open(&self, name: &str) -> Result<FileReader, Error>;

    /// Delete a stored file. Deleting a missing file succeeds.
    async fn delete(&self, name: &str) -> Result<(), Error>;

    /// Check if a file is stored under `name`
    async fn exists(&self, name: &str) -> Result<bool, Error>;

    /// Size of a stored file in bytes
    async fn size(&self, name: &str) -> Result<u64, Error>;
}
