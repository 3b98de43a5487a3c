//! SQLite store for the urlmap table
//! Handlers only read from it; rows are maintained with the admin tool

use crate::error::{Error, Result};
use crate::mapping::PathMapping;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Arc;

/// A persisted shortpath -> url row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub shortpath: String,
    pub url: String,
}

/// Shared handle to the SQLite connection holding the urlmap table
///
/// Cloning is cheap: clones share one connection behind a mutex.
#[derive(Clone)]
pub struct UrlStore {
    conn: Arc<Mutex<Connection>>,
}

impl UrlStore {
    /// Open (or create) the database file; the schema is not touched
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        Ok(Self::from_connection(conn))
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create the urlmap table if it does not exist yet
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS urlmap (
                shortpath TEXT NOT NULL UNIQUE,
                url TEXT NOT NULL
            );",
        )
        .map_err(Error::Schema)
    }

    /// Look up the target for an exact shortpath
    pub fn find_url(&self, shortpath: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();

        conn.query_row(
            "SELECT url FROM urlmap WHERE shortpath = ?1",
            params![shortpath],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::Query)
    }

    /// Insert a row, replacing the url of an existing shortpath
    pub fn set_url(&self, shortpath: &str, url: &str) -> Result<UrlRecord> {
        let conn = self.conn.lock();

        conn.execute(
            "INSERT INTO urlmap (shortpath, url) VALUES (?1, ?2)
             ON CONFLICT(shortpath) DO UPDATE SET url = excluded.url",
            params![shortpath, url],
        )
        .map_err(Error::Query)?;

        Ok(UrlRecord {
            shortpath: shortpath.to_string(),
            url: url.to_string(),
        })
    }

    /// Delete a shortpath, returning whether a row existed
    pub fn delete_url(&self, shortpath: &str) -> Result<bool> {
        let conn = self.conn.lock();

        let affected = conn
            .execute("DELETE FROM urlmap WHERE shortpath = ?1", params![shortpath])
            .map_err(Error::Query)?;

        Ok(affected > 0)
    }

    /// List all rows ordered by shortpath
    pub fn list_urls(&self) -> Result<Vec<UrlRecord>> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare("SELECT shortpath, url FROM urlmap ORDER BY shortpath")
            .map_err(Error::Query)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(UrlRecord {
                    shortpath: row.get(0)?,
                    url: row.get(1)?,
                })
            })
            .map_err(Error::Query)?;

        let records = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::Query)?;

        Ok(records)
    }

    /// Upsert every entry of a mapping in one transaction
    pub fn import_mapping(&self, mapping: &PathMapping) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(Error::Query)?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO urlmap (shortpath, url) VALUES (?1, ?2)
                     ON CONFLICT(shortpath) DO UPDATE SET url = excluded.url",
                )
                .map_err(Error::Query)?;

            for (shortpath, url) in mapping.iter() {
                stmt.execute(params![shortpath, url]).map_err(Error::Query)?;
            }
        }

        tx.commit().map_err(Error::Query)?;
        Ok(mapping.len())
    }
}
