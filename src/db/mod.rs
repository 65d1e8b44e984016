use crate::errors::{AppError, AppResult};
use crate::store::{SettingsStore, StoreFuture};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Sqlite-backed key-value store for the engine's persisted records.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| AppError::Io(err.to_string()))?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: path.to_path_buf(),
        })
    }

    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn read(&self, key: &str) -> AppResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| AppError::Internal("store mutex poisoned".to_string()))?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| AppError::Internal("store mutex poisoned".to_string()))?;
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now()],
        )?;
        Ok(())
    }
}

impl SettingsStore for SqliteStore {
    fn get(&self, key: String) -> StoreFuture<'_, Option<String>> {
        Box::pin(async move { self.read(&key) })
    }

    fn set(&self, key: String, value: String) -> StoreFuture<'_, ()> {
        Box::pin(async move { self.write(&key, &value) })
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteStore;
    use crate::store::{SettingsStore, NOTIF_ENABLED_KEY};

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let store = SqliteStore::in_memory().expect("open store");
        let value = store.get("UNKNOWN".to_string()).await.expect("read");
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn writes_overwrite_in_place() {
        let store = SqliteStore::in_memory().expect("open store");
        store
            .set(NOTIF_ENABLED_KEY.to_string(), "true".to_string())
            .await
            .expect("first write");
        store
            .set(NOTIF_ENABLED_KEY.to_string(), "false".to_string())
            .await
            .expect("second write");

        let value = store.get(NOTIF_ENABLED_KEY.to_string()).await.expect("read");
        assert_eq!(value.as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("reminders.db");

        {
            let store = SqliteStore::new(&path).expect("open store");
            store
                .set("PLANNED_PAYMENTS".to_string(), "[]".to_string())
                .await
                .expect("write");
        }

        let reopened = SqliteStore::new(&path).expect("reopen store");
        let value = reopened
            .get("PLANNED_PAYMENTS".to_string())
            .await
            .expect("read");
        assert_eq!(value.as_deref(), Some("[]"));
    }
}
