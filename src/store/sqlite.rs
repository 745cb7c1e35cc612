//! Durable store backed by SQLite.
//!
//! # Invariants
//! - The connection is opened and the table created on the first `put`/`get`,
//!   exactly once, even when several operations race to be first.
//! - Every statement runs on the blocking pool, never on the async executor.

use super::{KeyValueStore, StoreConfig, StoreError};
use crate::model::{Record, RecordKey};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::{debug, info};

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

/// SQLite key-value store with lazy, idempotent initialization.
#[derive(Debug)]
pub struct SqliteStore {
    location: Location,
    table: String,
    conn: OnceCell<Arc<Mutex<Connection>>>,
}

impl SqliteStore {
    /// Store living in `<dir>/<database>.sqlite3`.
    ///
    /// Nothing touches the filesystem until the first operation.
    pub fn new(dir: impl AsRef<Path>, config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let path = dir.as_ref().join(format!("{}.sqlite3", config.database));
        Ok(Self {
            location: Location::File(path),
            table: config.store,
            conn: OnceCell::new(),
        })
    }

    /// Store living in a private in-memory database.
    pub fn in_memory(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self {
            location: Location::Memory,
            table: config.store,
            conn: OnceCell::new(),
        })
    }

    /// Path of the database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory => None,
        }
    }

    async fn connection(&self) -> Result<Arc<Mutex<Connection>>, StoreError> {
        let conn = self
            .conn
            .get_or_try_init(|| {
                let location = self.location.clone();
                let table = self.table.clone();
                async move {
                    let conn = tokio::task::spawn_blocking(move || open(&location, &table)).await??;
                    Ok::<_, StoreError>(Arc::new(Mutex::new(conn)))
                }
            })
            .await?;
        Ok(conn.clone())
    }
}

fn open(location: &Location, table: &str) -> Result<Connection, StoreError> {
    let started_at = Instant::now();
    let conn = match location {
        Location::File(path) => Connection::open(path)?,
        Location::Memory => Connection::open_in_memory()?,
    };
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS \"{table}\" (
            namespace TEXT NOT NULL,
            key TEXT NOT NULL,
            record TEXT NOT NULL,
            PRIMARY KEY (namespace, key)
        );"
    ))?;
    info!(
        ?location,
        table,
        duration_ms = started_at.elapsed().as_millis() as u64,
        "Store opened"
    );
    Ok(conn)
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn put(
        &self,
        namespace: &str,
        key: &RecordKey,
        record: &Record,
    ) -> Result<(), StoreError> {
        let conn = self.connection().await?;
        let sql = format!(
            "INSERT INTO \"{}\" (namespace, key, record) VALUES (?1, ?2, ?3)
             ON CONFLICT(namespace, key) DO UPDATE SET record = excluded.record",
            self.table
        );
        let namespace = namespace.to_string();
        let key = key.as_str().to_string();
        let text = serde_json::to_string(record)?;

        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            conn.execute(&sql, params![namespace, key, text])?;
            debug!(%namespace, %key, "Put");
            Ok(())
        })
        .await?
    }

    async fn get(&self, namespace: &str, key: &RecordKey) -> Result<Option<Record>, StoreError> {
        let conn = self.connection().await?;
        let sql = format!(
            "SELECT record FROM \"{}\" WHERE namespace = ?1 AND key = ?2",
            self.table
        );
        let namespace = namespace.to_string();
        let key = key.as_str().to_string();

        let text: Option<String> = tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            conn.query_row(&sql, params![namespace, key], |row| row.get(0))
                .optional()
        })
        .await??;

        match text {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }
}
