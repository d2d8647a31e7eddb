// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::row::TrapRow;
use crate::store::{StoreError, TrapStore};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS traps (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    source TEXT NOT NULL,
    oid TEXT NOT NULL,
    generic_type INTEGER NOT NULL,
    value TEXT NOT NULL,
    custom_oid TEXT NOT NULL,
    custom_value TEXT NOT NULL,
    custom_type TEXT NOT NULL,
    unix_time INTEGER NOT NULL
);
";

/// `rusqlite`-backed `TrapStore`. `rusqlite::Connection` is synchronous, so
/// every call runs on the blocking pool, matching the daemon's general
/// preference for explicit `spawn_blocking` over ambient blocking I/O.
pub struct SqliteTrapStore {
    conn: Arc<Mutex<rusqlite::Connection>>,
}

impl SqliteTrapStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = rusqlite::Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = rusqlite::Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl TrapStore for SqliteTrapStore {
    async fn insert(&self, row: TrapRow) -> Result<String, StoreError> {
        let conn = self.conn.clone();
        let id = tokio::task::spawn_blocking(move || -> Result<i64, rusqlite::Error> {
            let conn = conn.lock();
            conn.execute(
                "INSERT INTO traps \
                 (timestamp, source, oid, generic_type, value, custom_oid, custom_value, custom_type, unix_time) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    row.timestamp,
                    row.source,
                    row.oid,
                    row.generic_type,
                    row.value,
                    row.custom_oid,
                    row.custom_value,
                    row.custom_type,
                    row.unix_time,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await??;

        Ok(id.to_string())
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
