//! Runtime SQL queries for record persistence

use crate::models::{EntityType, RecordId, StoredRecord};
use maid_errors::Error;
use sqlx::{query, Row, Sqlite, Transaction};

/// Insert a new record row and return its identity
pub async fn insert_record(
    tx: &mut Transaction<'_, Sqlite>,
    entity: &EntityType,
) -> Result<RecordId, Error> {
    let now = chrono::Utc::now().timestamp();

    let result = query("INSERT INTO records (entity, created_at, updated_at) VALUES (?1, ?2, ?2)")
        .bind(entity.as_str())
        .bind(now)
        .execute(&mut **tx)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Insert a record row under a caller-chosen identity
pub async fn insert_record_with_id(
    tx: &mut Transaction<'_, Sqlite>,
    id: RecordId,
    entity: &EntityType,
) -> Result<(), Error> {
    let now = chrono::Utc::now().timestamp();

    query("INSERT INTO records (id, entity, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)")
        .bind(id)
        .bind(entity.as_str())
        .bind(now)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Bump `updated_at`; returns the number of rows matched
pub async fn touch_record(
    tx: &mut Transaction<'_, Sqlite>,
    entity: &EntityType,
    id: RecordId,
) -> Result<u64, Error> {
    let now = chrono::Utc::now().timestamp();

    let result = query("UPDATE records SET updated_at = ?1 WHERE id = ?2 AND entity = ?3")
        .bind(now)
        .bind(id)
        .bind(entity.as_str())
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected())
}

/// Replace every stored field value of a record
pub async fn replace_fields(
    tx: &mut Transaction<'_, Sqlite>,
    entity: &EntityType,
    id: RecordId,
    values: &[(String, Option<String>)],
) -> Result<(), Error> {
    query("DELETE FROM record_fields WHERE record_id = ?1")
        .bind(id)
        .execute(&mut **tx)
        .await?;

    for (field, value) in values {
        query(
            "INSERT INTO record_fields (record_id, entity, field, value)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(id)
        .bind(entity.as_str())
        .bind(field)
        .bind(value.as_deref())
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Delete a record and its field values; returns the number of records removed
pub async fn delete_record(
    tx: &mut Transaction<'_, Sqlite>,
    entity: &EntityType,
    id: RecordId,
) -> Result<u64, Error> {
    query("DELETE FROM record_fields WHERE record_id = ?1")
        .bind(id)
        .execute(&mut **tx)
        .await?;

    let result = query("DELETE FROM records WHERE id = ?1 AND entity = ?2")
        .bind(id)
        .bind(entity.as_str())
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected())
}

/// Load records of an entity type, optionally only the one with `id`
pub async fn fetch_records(
    tx: &mut Transaction<'_, Sqlite>,
    entity: &EntityType,
    id: Option<RecordId>,
) -> Result<Vec<StoredRecord>, Error> {
    let rows = query(
        "SELECT r.id AS id, f.field AS field, f.value AS value
         FROM records r
         LEFT JOIN record_fields f ON f.record_id = r.id
         WHERE r.entity = ?1 AND (?2 IS NULL OR r.id = ?2)
         ORDER BY r.id, f.field",
    )
    .bind(entity.as_str())
    .bind(id)
    .fetch_all(&mut **tx)
    .await?;

    let mut records: Vec<StoredRecord> = Vec::new();
    for row in rows {
        let id: RecordId = row.get("id");
        let field: Option<String> = row.get("field");
        let value: Option<String> = row.get("value");

        if records.last().map(|record| record.id) != Some(id) {
            records.push(StoredRecord {
                id,
                fields: Vec::new(),
            });
        }
        if let (Some(field), Some(record)) = (field, records.last_mut()) {
            record.fields.push((field, value));
        }
    }

    Ok(records)
}

/// Does any record of `entity`, other than `exclude`, hold `value` in `field`?
pub async fn value_referenced_elsewhere(
    tx: &mut Transaction<'_, Sqlite>,
    entity: &EntityType,
    field: &str,
    value: &str,
    exclude: Option<RecordId>,
) -> Result<bool, Error> {
    let row = query(
        "SELECT EXISTS (
             SELECT 1 FROM record_fields
             WHERE entity = ?1 AND field = ?2 AND value = ?3
               AND (?4 IS NULL OR record_id != ?4)
         ) AS referenced",
    )
    .bind(entity.as_str())
    .bind(field)
    .bind(value)
    .bind(exclude)
    .fetch_one(&mut **tx)
    .await?;

    let referenced: i64 = row.get("referenced");
    Ok(referenced != 0)
}
