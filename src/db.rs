use std::fs::create_dir_all;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Row};
use serde_json::Value;

use crate::error::StoreError;

/// The saved-recipe collection: one row per schemaless JSON document.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if !dir.is_dir() {
                create_dir_all(dir)?;
            }
        }
        log::info!("Opening database at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        log::info!("Opening in-memory database");
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS saved_recipes (
                id INTEGER PRIMARY KEY,
                document TEXT NOT NULL
            )",
            (),
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Inserts `document` as a new row. Identical documents are stored twice.
    pub fn insert_recipe(&self, document: &Value) -> Result<i64, StoreError> {
        let text = serde_json::to_string(document)?;
        let db = self.lock()?;
        db.execute("INSERT INTO saved_recipes (document) VALUES (?1)", (text,))?;
        let id = db.last_insert_rowid();
        log::debug!("Inserted saved recipe {}", id);
        Ok(id)
    }

    /// Every stored document, in insertion order.
    pub fn list_recipes(&self) -> Result<Vec<Value>, StoreError> {
        let db = self.lock()?;
        let mut stmt = db.prepare("SELECT document FROM saved_recipes ORDER BY id")?;
        let texts = stmt
            .query_map((), row_to_document)?
            .collect::<Result<Vec<String>, rusqlite::Error>>()?;

        let documents = texts
            .iter()
            .map(|text| serde_json::from_str(text))
            .collect::<Result<Vec<Value>, serde_json::Error>>()?;
        log::debug!("Fetched {} saved recipes", documents.len());
        Ok(documents)
    }

    /// Releases the connection, reporting any error from the final flush.
    pub fn close(self) -> Result<(), StoreError> {
        let conn = self.conn.into_inner().map_err(|_| StoreError::Poisoned)?;
        conn.close().map_err(|(_, e)| StoreError::Sqlite(e))?;
        log::info!("Database connection closed");
        Ok(())
    }
}

fn row_to_document(row: &Row) -> Result<String, rusqlite::Error> {
    row.get(0)
}
