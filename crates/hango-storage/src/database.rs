// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database handle wrapping the single tokio-rusqlite connection.
//!
//! Every read and write is a closure executed on the connection's background
//! thread, so writes are serialized without SQLITE_BUSY contention. Do not
//! open additional connections for writes.

use std::path::Path;

use hango_core::HangoError;
use tracing::debug;

use crate::migrations::run_migrations;

/// An open, migrated SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path`, apply PRAGMAs and
    /// run embedded migrations.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, HangoError> {
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(HangoError::storage)?;
                }
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(HangoError::storage)?;

        let journal = if wal_mode { "WAL" } else { "DELETE" };
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(&format!(
                "PRAGMA journal_mode = {journal};
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;
                 PRAGMA foreign_keys = ON;"
            ))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| run_migrations(conn))
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(inner) => inner,
                other => HangoError::Storage {
                    source: other.to_string().into(),
                },
            })?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying connection, for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Flush the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), HangoError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

/// Convert a tokio-rusqlite error into [`HangoError::Storage`].
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> HangoError {
    HangoError::Storage {
        source: Box::new(e),
    }
}
