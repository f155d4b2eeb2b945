//! SQLite-backed record store
//!
//! Same column names and order as the CSV files. `serial_no` is a unique key
//! of `new_annotations` but not the rowid, so rows read back in insertion
//! order like the CSV files.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use super::{ensure_key_field, ensure_shape, RecordStore, StorageBackend};
use crate::models::{parse_serial_no, ApprovedRecord, Collection, PendingRecord, ProverbRecord};
use crate::time::{parse_timestamp, TIMESTAMP_FORMAT};
use crate::{Error, Result};

/// Record store over an embedded SQLite database
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database and its two tables
    pub async fn open(db_path: &Path) -> Result<Self> {
        let newly_created = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_millis(5000));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        if newly_created {
            info!("Initialized new database: {}", db_path.display());
        } else {
            info!("Opened existing database: {}", db_path.display());
        }

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the tables if they are missing
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        create_pending_table(&pool).await?;
        create_repository_table(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn create_pending_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS new_annotations (
            serial_no INTEGER NOT NULL UNIQUE,
            proverb_telugu TEXT NOT NULL,
            proverb_english TEXT NOT NULL,
            meaning_english TEXT NOT NULL DEFAULT '',
            keywords TEXT NOT NULL DEFAULT '',
            annotator TEXT NOT NULL,
            timestamp TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_repository_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS repository (
            proverb_telugu TEXT NOT NULL,
            proverb_english TEXT NOT NULL,
            meaning_english TEXT NOT NULL DEFAULT '',
            keywords TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn pending_from_row(row: &SqliteRow) -> Result<PendingRecord> {
    let timestamp: String = row.try_get("timestamp")?;
    let created_at = parse_timestamp(&timestamp)
        .ok_or_else(|| Error::Storage(format!("invalid timestamp in new_annotations: {:?}", timestamp)))?;

    Ok(PendingRecord {
        serial_no: row.try_get("serial_no")?,
        source_text: row.try_get("proverb_telugu")?,
        translated_text: row.try_get("proverb_english")?,
        meaning: row.try_get("meaning_english")?,
        keywords: row.try_get("keywords")?,
        contributor: row.try_get("annotator")?,
        created_at,
    })
}

fn approved_from_row(row: &SqliteRow) -> Result<ApprovedRecord> {
    Ok(ApprovedRecord {
        source_text: row.try_get("proverb_telugu")?,
        translated_text: row.try_get("proverb_english")?,
        meaning: row.try_get("meaning_english")?,
        keywords: row.try_get("keywords")?,
    })
}

const INSERT_PENDING: &str = r#"
    INSERT INTO new_annotations (
        serial_no, proverb_telugu, proverb_english, meaning_english,
        keywords, annotator, timestamp
    ) VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

const INSERT_APPROVED: &str = r#"
    INSERT INTO repository (proverb_telugu, proverb_english, meaning_english, keywords)
    VALUES (?, ?, ?, ?)
"#;

#[async_trait]
impl RecordStore for SqliteStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Sqlite
    }

    async fn read_all(&self, collection: Collection) -> Result<Vec<ProverbRecord>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            collection.columns().join(", "),
            collection.table_name()
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| match collection {
                Collection::Pending => pending_from_row(row).map(ProverbRecord::Pending),
                Collection::Repository => approved_from_row(row).map(ProverbRecord::Approved),
            })
            .collect()
    }

    async fn append(&self, collection: Collection, record: &ProverbRecord) -> Result<()> {
        ensure_shape(collection, record)?;

        match record {
            ProverbRecord::Pending(r) => {
                sqlx::query(INSERT_PENDING)
                    .bind(r.serial_no)
                    .bind(&r.source_text)
                    .bind(&r.translated_text)
                    .bind(&r.meaning)
                    .bind(&r.keywords)
                    .bind(&r.contributor)
                    .bind(r.created_at.format(TIMESTAMP_FORMAT).to_string())
                    .execute(&self.pool)
                    .await?;
            }
            ProverbRecord::Approved(r) => {
                sqlx::query(INSERT_APPROVED)
                    .bind(&r.source_text)
                    .bind(&r.translated_text)
                    .bind(&r.meaning)
                    .bind(&r.keywords)
                    .execute(&self.pool)
                    .await?;
            }
        }

        debug!(%collection, "Appended row");
        Ok(())
    }

    async fn remove_by_key(
        &self,
        collection: Collection,
        key_field: &str,
        key_value: &str,
    ) -> Result<usize> {
        ensure_key_field(collection, key_field)?;

        // Identifiers come from the declared column list, never from input
        let sql = format!("DELETE FROM {} WHERE {} = ?", collection.table_name(), key_field);
        let query = sqlx::query(&sql);
        let query = if key_field == "serial_no" {
            match parse_serial_no(key_value) {
                Some(serial_no) => query.bind(serial_no),
                None => return Ok(0),
            }
        } else {
            query.bind(key_value.to_string())
        };

        let removed = query.execute(&self.pool).await?.rows_affected();
        Ok(removed as usize)
    }

    async fn transfer(&self, serial_no: i64, approved: &ApprovedRecord) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM new_annotations WHERE serial_no = ?")
            .bind(serial_no)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(INSERT_APPROVED)
            .bind(&approved.source_text)
            .bind(&approved.translated_text)
            .bind(&approved.meaning)
            .bind(&approved.keywords)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}
