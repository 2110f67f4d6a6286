#![forbid(unsafe_code)]

use crate::StoreError;
use crate::document::{Document, DocumentStore, StoredDoc};
use crate::path::{CollectionPath, DocPath};
use crate::watch::{ChangeKind, Subscription, Watchers};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const SCHEMA_VERSION: i64 = 1;
const DB_FILE_NAME: &str = "ecoluxe.db";
const DOC_ID_COUNTER: &str = "doc_id";

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: Option<PathBuf>,
    watchers: Watchers,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        preflight_gate(&conn)?;
        install_schema(&conn)?;
        info!(path = %db_path.display(), "document store opened");

        Ok(Self {
            conn,
            storage_dir: Some(storage_dir),
            watchers: Watchers::default(),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        install_schema(&conn)?;
        Ok(Self {
            conn,
            storage_dir: None,
            watchers: Watchers::default(),
        })
    }

    pub fn storage_dir(&self) -> Option<&Path> {
        self.storage_dir.as_deref()
    }

    pub fn subscriber_count(&self) -> usize {
        self.watchers.len()
    }
}

impl DocumentStore for SqliteStore {
    fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        let raw = self
            .conn
            .query_row(
                "SELECT data_json FROM documents WHERE collection=?1 AND id=?2",
                params![path.collection().as_str(), path.id()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        raw.as_deref().map(decode_document).transpose()
    }

    fn set(&mut self, path: &DocPath, doc: Document) -> Result<(), StoreError> {
        let now_ms = now_ms();
        let data_json = serde_json::to_string(&doc)?;
        let tx = self.conn.transaction()?;
        upsert_tx(&tx, path, &data_json, now_ms)?;
        tx.commit()?;
        debug!(path = %path, "document set");
        self.watchers.notify(path, ChangeKind::Set);
        Ok(())
    }

    fn merge(&mut self, path: &DocPath, fields: Document) -> Result<(), StoreError> {
        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let mut doc = load_tx(&tx, path)?.ok_or(StoreError::UnknownId)?;
        for (key, value) in fields {
            doc.insert(key, value);
        }
        upsert_tx(&tx, path, &serde_json::to_string(&doc)?, now_ms)?;
        tx.commit()?;
        debug!(path = %path, "document merged");
        self.watchers.notify(path, ChangeKind::Merged);
        Ok(())
    }

    fn increment(&mut self, path: &DocPath, field: &str, by: i64) -> Result<i64, StoreError> {
        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let mut doc = load_tx(&tx, path)?.ok_or(StoreError::UnknownId)?;
        let current = match doc.get(field) {
            None | Some(Value::Null) => 0,
            Some(value) => value
                .as_i64()
                .ok_or(StoreError::InvalidInput("increment target is not an integer"))?,
        };
        let next = current
            .checked_add(by)
            .ok_or(StoreError::InvalidInput("numeric overflow"))?;
        doc.insert(field.to_string(), Value::from(next));
        upsert_tx(&tx, path, &serde_json::to_string(&doc)?, now_ms)?;
        tx.commit()?;
        debug!(path = %path, field, value = next, "document field incremented");
        self.watchers.notify(path, ChangeKind::Merged);
        Ok(next)
    }

    fn delete(&mut self, path: &DocPath) -> Result<bool, StoreError> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM documents WHERE collection=?1 AND id=?2",
            params![path.collection().as_str(), path.id()],
        )?;
        tx.commit()?;
        if deleted > 0 {
            debug!(path = %path, "document deleted");
            self.watchers.notify(path, ChangeKind::Deleted);
        }
        Ok(deleted > 0)
    }

    fn add(&mut self, collection: &CollectionPath, doc: Document) -> Result<DocPath, StoreError> {
        let now_ms = now_ms();
        let data_json = serde_json::to_string(&doc)?;
        let tx = self.conn.transaction()?;
        let seq = next_counter_tx(&tx, DOC_ID_COUNTER)?;
        let path = collection.doc(&format!("d{seq:016}"))?;
        upsert_tx(&tx, &path, &data_json, now_ms)?;
        tx.commit()?;
        debug!(path = %path, "document added");
        self.watchers.notify(&path, ChangeKind::Set);
        Ok(path)
    }

    fn list(&self, collection: &CollectionPath) -> Result<Vec<StoredDoc>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, data_json FROM documents WHERE collection=?1 ORDER BY id ASC",
        )?;
        let mut rows = stmt.query(params![collection.as_str()])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let id = row.get::<_, String>(0)?;
            let data = decode_document(&row.get::<_, String>(1)?)?;
            out.push(StoredDoc { id, data });
        }
        Ok(out)
    }

    fn subscribe(&mut self, collection: &CollectionPath) -> Result<Subscription, StoreError> {
        debug!(collection = %collection, "subscription opened");
        Ok(self.watchers.subscribe(collection))
    }
}

fn decode_document(raw: &str) -> Result<Document, StoreError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::InvalidInput("stored document is not an object")),
    }
}

fn load_tx(tx: &Transaction<'_>, path: &DocPath) -> Result<Option<Document>, StoreError> {
    let raw = tx
        .query_row(
            "SELECT data_json FROM documents WHERE collection=?1 AND id=?2",
            params![path.collection().as_str(), path.id()],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    raw.as_deref().map(decode_document).transpose()
}

fn upsert_tx(
    tx: &Transaction<'_>,
    path: &DocPath,
    data_json: &str,
    now_ms: i64,
) -> Result<(), StoreError> {
    tx.execute(
        r#"
        INSERT INTO documents(collection, id, data_json, created_at_ms, updated_at_ms)
        VALUES (?1, ?2, ?3, ?4, ?4)
        ON CONFLICT(collection, id) DO UPDATE SET
          data_json=excluded.data_json,
          updated_at_ms=excluded.updated_at_ms
        "#,
        params![path.collection().as_str(), path.id(), data_json, now_ms],
    )?;
    Ok(())
}

fn next_counter_tx(tx: &Transaction<'_>, name: &str) -> Result<i64, StoreError> {
    tx.execute(
        r#"
        INSERT INTO counters(name, value) VALUES (?1, 1)
        ON CONFLICT(name) DO UPDATE SET value=value + 1
        "#,
        params![name],
    )?;
    Ok(tx.query_row(
        "SELECT value FROM counters WHERE name=?1",
        params![name],
        |row| row.get::<_, i64>(0),
    )?)
}

fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tables.insert(row.get::<_, String>(0)?);
    }

    if tables.is_empty() {
        return Ok(());
    }

    for table in ["store_state", "counters", "documents"] {
        if !tables.contains(table) {
            return Err(StoreError::InvalidInput(
                "RESET_REQUIRED: required table is missing",
            ));
        }
    }

    let version = conn
        .query_row(
            "SELECT schema_version FROM store_state WHERE singleton=1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;

    match version {
        Some(v) if v == SCHEMA_VERSION => Ok(()),
        Some(_) => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema version mismatch",
        )),
        None => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema state row is missing",
        )),
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    let now_ms = now_ms();

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS store_state (
          singleton INTEGER PRIMARY KEY CHECK(singleton = 1),
          schema_version INTEGER NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS counters (
          name TEXT PRIMARY KEY,
          value INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS documents (
          collection TEXT NOT NULL,
          id TEXT NOT NULL,
          data_json TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          PRIMARY KEY(collection, id)
        );
        "#,
    )?;

    conn.execute(
        "INSERT INTO store_state(singleton, schema_version, created_at_ms, updated_at_ms) \
         VALUES (1, ?1, ?2, ?2) \
         ON CONFLICT(singleton) DO UPDATE SET schema_version=excluded.schema_version, updated_at_ms=excluded.updated_at_ms",
        params![SCHEMA_VERSION, now_ms],
    )?;
    Ok(())
}

fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration,
        Err(_) => return 0,
    };

    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
