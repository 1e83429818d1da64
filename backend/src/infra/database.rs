use crate::core::models::{PhotoId, SavedPhotoRecord};
use crate::core::storage::{PhotoStore, StorageError};
use crate::infra::config::DatabaseTarget;
use libsql::{Builder, Connection};
use tokio::sync::Mutex;
use tracing::info;

const SAVED_TABLE: &str = "saved_photos";
const MIRROR_TABLE: &str = "photo_mirror";

// ═══════════════════════════════════════════════════════════════
// Database — the single Local Store handle, opened once at startup.
// ═══════════════════════════════════════════════════════════════

pub struct Database {
    // One connection; the mutex keeps transactions from interleaving.
    conn: Mutex<Connection>,
}

impl Database {
    pub async fn open(target: &DatabaseTarget) -> Result<Self, StorageError> {
        match target {
            DatabaseTarget::Local { path } => Self::local(path).await,
            DatabaseTarget::Turso { url, token } => Self::turso(url, token).await,
        }
    }

    /// Connect to a local SQLite file.
    pub async fn local(path: &str) -> Result<Self, StorageError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Builder::new_local(path).build().await.map_err(db_err)?;
        let conn = db.connect().map_err(db_err)?;

        let storage = Self { conn: Mutex::new(conn) };
        storage.run_migrations().await?;
        info!(path, "Opened local photo store");
        Ok(storage)
    }

    /// Connect to a remote Turso database.
    pub async fn turso(url: &str, token: &str) -> Result<Self, StorageError> {
        let db = Builder::new_remote(url.to_string(), token.to_string())
            .build()
            .await
            .map_err(db_err)?;
        let conn = db.connect().map_err(db_err)?;

        let storage = Self { conn: Mutex::new(conn) };
        storage.run_migrations().await?;
        info!(url, "Connected to remote photo store");
        Ok(storage)
    }

    async fn run_migrations(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        for table in [SAVED_TABLE, MIRROR_TABLE] {
            conn.execute(
                &format!(
                    "CREATE TABLE IF NOT EXISTS {table} (
                        id            INTEGER PRIMARY KEY,
                        album_id      INTEGER NOT NULL,
                        title         TEXT NOT NULL,
                        thumbnail_url TEXT NOT NULL,
                        image_url     TEXT,
                        album_title   TEXT
                    )"
                ),
                (),
            )
            .await
            .map_err(db_err)?;
        }
        Ok(())
    }

    async fn upsert_into(
        &self,
        table: &str,
        records: &[SavedPhotoRecord],
    ) -> Result<usize, StorageError> {
        let conn = self.conn.lock().await;
        let tx = conn.transaction().await.map_err(db_err)?;

        let sql = format!(
            "INSERT OR REPLACE INTO {table}
                (id, album_id, title, thumbnail_url, image_url, album_title)
             VALUES (?1,?2,?3,?4,?5,?6)"
        );
        for record in records {
            tx.execute(
                &sql,
                libsql::params![
                    record.id,
                    record.album_id,
                    record.title.clone(),
                    record.thumbnail_url.clone(),
                    record.image_url.clone(),
                    record.album_title.clone(),
                ],
            )
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(records.len())
    }
}

impl PhotoStore for Database {
    async fn load_saved(&self) -> Result<Vec<SavedPhotoRecord>, StorageError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT id, album_id, title, thumbnail_url, image_url, album_title
                     FROM {SAVED_TABLE} ORDER BY id"
                ),
                (),
            )
            .await
            .map_err(db_err)?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err)? {
            records.push(row_to_record(&row)?);
        }
        Ok(records)
    }

    async fn upsert_saved(&self, records: &[SavedPhotoRecord]) -> Result<(), StorageError> {
        self.upsert_into(SAVED_TABLE, records).await.map(|_| ())
    }

    async fn delete_saved(&self, id: PhotoId) -> Result<bool, StorageError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute(
                &format!("DELETE FROM {SAVED_TABLE} WHERE id = ?1"),
                libsql::params![id],
            )
            .await
            .map_err(db_err)?;
        Ok(affected > 0)
    }

    async fn mirror_photos(&self, records: &[SavedPhotoRecord]) -> Result<usize, StorageError> {
        self.upsert_into(MIRROR_TABLE, records).await
    }

    async fn mirrored_count(&self) -> Result<usize, StorageError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(&format!("SELECT COUNT(*) FROM {MIRROR_TABLE}"), ())
            .await
            .map_err(db_err)?;
        let count = match rows.next().await.map_err(db_err)? {
            Some(row) => row.get::<i64>(0).map_err(db_err)?,
            None => 0,
        };
        usize::try_from(count).map_err(|e| StorageError::Corruption(format!("Row count: {e}")))
    }
}

// ═══════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════

fn db_err(e: libsql::Error) -> StorageError {
    StorageError::Database(e.to_string())
}

fn row_to_record(row: &libsql::Row) -> Result<SavedPhotoRecord, StorageError> {
    Ok(SavedPhotoRecord {
        id: row.get::<i64>(0).map_err(db_err)?,
        album_id: row.get::<i64>(1).map_err(db_err)?,
        title: row.get::<String>(2).map_err(db_err)?,
        thumbnail_url: row.get::<String>(3).map_err(db_err)?,
        image_url: optional_text(row, 4),
        album_title: optional_text(row, 5),
    })
}

fn optional_text(row: &libsql::Row, idx: i32) -> Option<String> {
    row.get::<libsql::Value>(idx).ok().and_then(|v| match v {
        libsql::Value::Text(s) => Some(s),
        _ => None,
    })
}
