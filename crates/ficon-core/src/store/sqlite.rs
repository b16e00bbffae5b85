//! SQLite-backed blob store (sqlx).
//!
//! One row per key; `put` is a single upsert so readers never see a partial
//! object.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{now_millis, BlobObject, BlobStore};

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Default database location: `~/.local/state/ficon/icons.db`.
pub fn default_db_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ficon")?;
    Ok(xdg_dirs.get_state_home().join("icons.db"))
}

/// Handle to the SQLite blob table.
#[derive(Clone)]
pub struct SqliteBlobStore {
    pool: Pool<Sqlite>,
}

impl SqliteBlobStore {
    /// Open (or create) the default database and run migrations.
    pub async fn open_default() -> Result<Self> {
        Self::open_at(default_db_path()?).await
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect(&uri)
            .await
            .with_context(|| format!("open icon database {}", path.display()))?;
        let store = SqliteBlobStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// In-memory database (no disk I/O).
    pub async fn open_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = SqliteBlobStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        // - `metadata_json` holds the object's custom metadata map.
        // - `updated_at` is Unix milliseconds of the last put.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blobs (
                key TEXT PRIMARY KEY NOT NULL,
                body BLOB NOT NULL,
                content_type TEXT,
                metadata_json TEXT NOT NULL DEFAULT '{}',
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Number of stored objects.
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM blobs")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }
}

#[async_trait]
impl BlobStore for SqliteBlobStore {
    async fn get(&self, key: &str) -> Result<Option<BlobObject>> {
        let row = sqlx::query(
            r#"
            SELECT body, content_type, metadata_json
            FROM blobs
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let body: Vec<u8> = row.get("body");
        let content_type: Option<String> = row.get("content_type");
        let metadata_json: String = row.get("metadata_json");
        let metadata: BTreeMap<String, String> = serde_json::from_str(&metadata_json)
            .with_context(|| format!("corrupt metadata for key {key}"))?;

        Ok(Some(BlobObject {
            body,
            content_type,
            metadata,
        }))
    }

    async fn put(&self, key: &str, object: BlobObject) -> Result<()> {
        let metadata_json = serde_json::to_string(&object.metadata)?;
        sqlx::query(
            r#"
            INSERT INTO blobs (key, body, content_type, metadata_json, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(key) DO UPDATE SET
                body = excluded.body,
                content_type = excluded.content_type,
                metadata_json = excluded.metadata_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(&object.body)
        .bind(&object.content_type)
        .bind(metadata_json)
        .bind(now_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
