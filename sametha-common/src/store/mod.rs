//! Record store: two named collections of proverb rows
//!
//! Backends:
//! - [`CsvStore`]: the `data/` layout the annotation team edits by hand
//! - [`SqliteStore`]: embedded transactional store with indexed serial lookup
//!
//! Both expose the same primitives plus [`RecordStore::transfer`], the move
//! used by approval so a row is never observable in both collections.

mod csv_store;
mod journal;
mod sqlite_store;

pub use csv_store::CsvStore;
pub use journal::{ApprovalJournal, JournalEntry};
pub use sqlite_store::SqliteStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use crate::config::RootFolderInitializer;
use crate::models::{parse_serial_no, ApprovedRecord, Collection, PendingRecord, ProverbRecord};
use crate::{Error, Result};

/// Which persistence backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Csv,
    Sqlite,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Csv => write!(f, "csv"),
            StorageBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(StorageBackend::Csv),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(format!("unknown storage backend: {} (expected csv or sqlite)", other)),
        }
    }
}

/// Tabular persistence for the pending and repository collections
#[async_trait]
pub trait RecordStore: Send + Sync {
    fn backend(&self) -> StorageBackend;

    /// All rows in stored order.
    ///
    /// Missing or empty storage reads as an empty collection. Storage that
    /// exists but cannot be parsed is an [`Error::Storage`].
    async fn read_all(&self, collection: Collection) -> Result<Vec<ProverbRecord>>;

    /// Add one row after the existing rows
    async fn append(&self, collection: Collection, record: &ProverbRecord) -> Result<()>;

    /// Delete every row whose `key_field` column equals `key_value`.
    ///
    /// Returns the number of rows removed.
    async fn remove_by_key(
        &self,
        collection: Collection,
        key_field: &str,
        key_value: &str,
    ) -> Result<usize>;

    /// Move pending row `serial_no` into the repository as `approved`.
    ///
    /// Returns `false` without touching either collection when no pending row
    /// has that serial number.
    async fn transfer(&self, serial_no: i64, approved: &ApprovedRecord) -> Result<bool>;

    async fn read_pending(&self) -> Result<Vec<PendingRecord>> {
        Ok(self
            .read_all(Collection::Pending)
            .await?
            .into_iter()
            .filter_map(|record| match record {
                ProverbRecord::Pending(r) => Some(r),
                ProverbRecord::Approved(_) => None,
            })
            .collect())
    }

    async fn read_repository(&self) -> Result<Vec<ApprovedRecord>> {
        Ok(self
            .read_all(Collection::Repository)
            .await?
            .into_iter()
            .filter_map(|record| match record {
                ProverbRecord::Approved(r) => Some(r),
                ProverbRecord::Pending(_) => None,
            })
            .collect())
    }
}

/// Open the configured backend rooted at `root_folder`
pub async fn open_store(
    backend: StorageBackend,
    root_folder: &Path,
) -> Result<Arc<dyn RecordStore>> {
    let layout = RootFolderInitializer::new(root_folder.to_path_buf());
    let store: Arc<dyn RecordStore> = match backend {
        StorageBackend::Csv => Arc::new(CsvStore::open(layout.data_dir()).await?),
        StorageBackend::Sqlite => Arc::new(SqliteStore::open(&layout.database_path()).await?),
    };
    Ok(store)
}

/// Reject a row whose shape does not belong to `collection`
pub(crate) fn ensure_shape(collection: Collection, record: &ProverbRecord) -> Result<()> {
    if record.collection() == collection {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{} row cannot be stored in the {} collection",
            record.collection(),
            collection
        )))
    }
}

/// Reject a key field that is not a declared column of `collection`
pub(crate) fn ensure_key_field(collection: Collection, key_field: &str) -> Result<()> {
    if collection.has_column(key_field) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{} is not a column of the {} collection",
            key_field, collection
        )))
    }
}

/// Whether `record`'s `key_field` cell equals `key_value`.
///
/// Serial numbers compare numerically so `"3"` matches a row read as `3.0`.
pub(crate) fn matches_key(record: &ProverbRecord, key_field: &str, key_value: &str) -> bool {
    match (record, key_field) {
        (ProverbRecord::Pending(r), "serial_no") => parse_serial_no(key_value) == Some(r.serial_no),
        (ProverbRecord::Pending(r), "annotator") => r.contributor == key_value,
        (ProverbRecord::Pending(r), "timestamp") => {
            r.created_at.format(crate::time::TIMESTAMP_FORMAT).to_string() == key_value
        }
        (record, "proverb_telugu") => record.source_text() == key_value,
        (record, "proverb_english") => record.translated_text() == key_value,
        (ProverbRecord::Pending(r), "meaning_english") => r.meaning == key_value,
        (ProverbRecord::Approved(r), "meaning_english") => r.meaning == key_value,
        (ProverbRecord::Pending(r), "keywords") => r.keywords == key_value,
        (ProverbRecord::Approved(r), "keywords") => r.keywords == key_value,
        _ => false,
    }
}

/// Replace `path` with `bytes` via a synced temp file and rename
pub(crate) async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);

    let mut file = tokio::fs::File::create(&tmp_path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approved(source: &str, english: &str) -> ProverbRecord {
        ProverbRecord::Approved(ApprovedRecord {
            source_text: source.to_string(),
            translated_text: english.to_string(),
            meaning: String::new(),
            keywords: "k1, k2".to_string(),
        })
    }

    #[test]
    fn test_backend_parse_and_display() {
        assert_eq!("SQLite".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
        assert_eq!(StorageBackend::Csv.to_string(), "csv");
        assert!("postgres".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_ensure_shape_rejects_mismatched_row() {
        let row = approved("a", "b");
        assert!(ensure_shape(Collection::Repository, &row).is_ok());
        assert!(matches!(
            ensure_shape(Collection::Pending, &row),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_ensure_key_field_requires_declared_column() {
        assert!(ensure_key_field(Collection::Pending, "serial_no").is_ok());
        assert!(ensure_key_field(Collection::Repository, "serial_no").is_err());
        assert!(ensure_key_field(Collection::Pending, "serial_no; DROP TABLE x").is_err());
    }

    #[test]
    fn test_matches_key_on_text_columns() {
        let row = approved("ఆరు నెలలు", "six months");
        assert!(matches_key(&row, "proverb_english", "six months"));
        assert!(matches_key(&row, "keywords", "k1, k2"));
        assert!(!matches_key(&row, "proverb_english", "Six months"));
        assert!(!matches_key(&row, "serial_no", "1"));
    }

    #[tokio::test]
    async fn test_write_atomically_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.csv");
        write_atomically(&path, b"one").await.unwrap();
        write_atomically(&path, b"two").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"two");
        assert!(!dir.path().join("x.csv.tmp").exists());
    }
}
