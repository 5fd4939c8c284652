// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value operations on the `kv_store` table.

use emipro_core::EmiproError;
use rusqlite::{params, OptionalExtension};

use crate::database::{map_tr_err, Database};

/// Insert or replace the value stored under `key`.
pub async fn put(db: &Database, key: &str, value: &str) -> Result<(), EmiproError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Read a value without removing it.
pub async fn get(db: &Database, key: &str) -> Result<Option<String>, EmiproError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            conn.query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Atomically read and delete the value under `key`.
///
/// Two concurrent takes of the same key never both see the value.
pub async fn take(db: &Database, key: &str) -> Result<Option<String>, EmiproError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let value: Option<String> = tx
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            if value.is_some() {
                tx.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
            }
            tx.commit()?;
            Ok(value)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete the value under `key`. Deleting a missing key is not an error.
pub async fn remove(db: &Database, key: &str) -> Result<(), EmiproError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
