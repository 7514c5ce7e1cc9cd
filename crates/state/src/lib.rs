#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions, clippy::missing_panics_doc)]

//! Record persistence for maid
//!
//! This crate stores records of schema-described entity types in `SQLite`
//! and exposes the lifecycle hooks (pre-update, post-update, post-delete)
//! that the orphan file tracker subscribes to.

pub mod hooks;
pub mod manager;
pub mod models;
pub mod queries;
pub mod schema;

pub use hooks::{LifecycleHook, UpdateContext};
pub use manager::RecordManager;
pub use models::{EntityType, FieldValue, Record, RecordId, StoredRecord};
pub use schema::{EntitySchema, FieldDef, FieldKind};

use maid_config::StateConfig;
use maid_errors::Error;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Pool, Sqlite};
use std::path::Path;

/// Create a new `SQLite` connection pool with default settings
///
/// # Errors
///
/// Returns an error if the database connection fails or configuration is invalid.
pub async fn create_pool(db_path: &Path) -> Result<Pool<Sqlite>, Error> {
    create_pool_with_config(db_path, &StateConfig::default()).await
}

/// Create a new `SQLite` connection pool
///
/// # Errors
///
/// Returns an error if the database connection fails or configuration is invalid.
pub async fn create_pool_with_config(
    db_path: &Path,
    config: &StateConfig,
) -> Result<Pool<Sqlite>, Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .pragma("temp_store", "MEMORY")
        .busy_timeout(config.busy_timeout());

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(|e| {
            Error::from(maid_errors::StateError::DatabaseError {
                message: e.to_string(),
            })
        })?;

    Ok(pool)
}

/// Run database migrations
///
/// # Errors
///
/// Returns an error if any migration fails to execute.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), Error> {
    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        maid_errors::StateError::MigrationFailed {
            message: e.to_string(),
        }
        .into()
    })
}
