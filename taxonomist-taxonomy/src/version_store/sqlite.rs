use super::VersionStore;
use crate::error::{TaxonomyError, TaxonomyResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::{Path, PathBuf};
use taxonomist_core::{ChangeEntry, ContentId, VersionRecord};
use tokio::task;
use tracing::debug;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS versions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content_id TEXT NOT NULL,
    number INTEGER NOT NULL,
    object_changes TEXT NOT NULL,
    note TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    UNIQUE (content_id, number)
);
CREATE INDEX IF NOT EXISTS idx_versions_content_id ON versions(content_id);
"#;

/// Version log persisted in a SQLite file.
///
/// Every call opens its own connection on the blocking pool.
#[derive(Debug, Clone)]
pub struct SqliteVersionStore {
    db_path: PathBuf,
}

impl SqliteVersionStore {
    /// Open (creating if needed) the database at `db_path`
    pub async fn open(db_path: impl AsRef<Path>) -> TaxonomyResult<Self> {
        let path = db_path.as_ref().to_path_buf();
        let path_clone = path.clone();

        task::spawn_blocking(move || {
            if let Some(parent) = path_clone.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    TaxonomyError::Storage(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
            let conn = Connection::open(&path_clone)?;
            conn.execute_batch(SCHEMA)?;
            Ok::<_, TaxonomyError>(())
        })
        .await??;

        debug!("Opened version log at {}", path.display());
        Ok(Self { db_path: path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<(String, u32, String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn decode(
    (content_id, number, changes, note, created_at): (String, u32, String, String, String),
) -> TaxonomyResult<VersionRecord> {
    let object_changes: Vec<ChangeEntry> = serde_json::from_str(&changes)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| TaxonomyError::Storage(format!("bad timestamp {}: {}", created_at, e)))?
        .with_timezone(&Utc);

    Ok(VersionRecord {
        content_id: ContentId::new(content_id),
        number,
        object_changes,
        note,
        created_at,
    })
}

#[async_trait]
impl VersionStore for SqliteVersionStore {
    async fn append(
        &self,
        content_id: &ContentId,
        changes: Vec<ChangeEntry>,
        note: &str,
    ) -> TaxonomyResult<VersionRecord> {
        let path = self.db_path.clone();
        let content_id = content_id.clone();
        let changes_json = serde_json::to_string(&changes)?;
        let note = note.to_string();

        task::spawn_blocking(move || -> TaxonomyResult<VersionRecord> {
            let mut conn = Connection::open(&path)?;
            // Take the write lock before reading MAX(number)
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let number: u32 = tx.query_row(
                "SELECT COALESCE(MAX(number), 0) + 1 FROM versions WHERE content_id = ?1",
                params![content_id.as_str()],
                |row| row.get(0),
            )?;
            let created_at = Utc::now();

            tx.execute(
                "INSERT INTO versions (content_id, number, object_changes, note, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    content_id.as_str(),
                    number,
                    &changes_json,
                    &note,
                    created_at.to_rfc3339()
                ],
            )?;
            tx.commit()?;

            Ok(VersionRecord {
                content_id,
                number,
                object_changes: changes,
                note,
                created_at,
            })
        })
        .await?
    }

    async fn versions(&self, content_id: &ContentId) -> TaxonomyResult<Vec<VersionRecord>> {
        let path = self.db_path.clone();
        let content_id = content_id.clone();

        task::spawn_blocking(move || -> TaxonomyResult<Vec<VersionRecord>> {
            let conn = Connection::open(&path)?;
            let mut stmt = conn.prepare(
                "SELECT content_id, number, object_changes, note, created_at
                 FROM versions WHERE content_id = ?1 ORDER BY number ASC",
            )?;
            let rows = stmt
                .query_map(params![content_id.as_str()], record_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.into_iter().map(decode).collect()
        })
        .await?
    }

    async fn version(
        &self,
        content_id: &ContentId,
        number: u32,
    ) -> TaxonomyResult<Option<VersionRecord>> {
        let path = self.db_path.clone();
        let content_id = content_id.clone();

        task::spawn_blocking(move || -> TaxonomyResult<Option<VersionRecord>> {
            let conn = Connection::open(&path)?;
            let row = conn
                .query_row(
                    "SELECT content_id, number, object_changes, note, created_at
                     FROM versions WHERE content_id = ?1 AND number = ?2",
                    params![content_id.as_str(), number],
                    record_from_row,
                )
                .optional()?;
            row.map(decode).transpose()
        })
        .await?
    }

    async fn count(&self) -> TaxonomyResult<usize> {
        let path = self.db_path.clone();

        task::spawn_blocking(move || -> TaxonomyResult<usize> {
            let conn = Connection::open(&path)?;
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM versions", [], |row| row.get(0))?;
            Ok(count as usize)
        })
        .await?
    }
}
