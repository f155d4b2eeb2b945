//! CSV-backed record store
//!
//! Layout under the data folder:
//! - `new_annotations.csv`: pending submissions
//! - `repository.csv`: approved proverbs
//! - `approval.journal`: present only while an approval is in flight
//!
//! Files are written as UTF-8 with a BOM so spreadsheet tools detect the
//! encoding. Reads fall back to Windows-1252 for files saved by tools that
//! ignored it.

use async_trait::async_trait;
use encoding_rs::WINDOWS_1252;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::journal::{ApprovalJournal, JournalEntry, JOURNAL_FILE_NAME};
use super::{ensure_key_field, ensure_shape, matches_key, write_atomically};
use super::{RecordStore, StorageBackend};
use crate::models::{ApprovedRecord, Collection, PendingRecord, ProverbRecord};
use crate::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Record store over two CSV files
#[derive(Debug, Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
    journal: ApprovalJournal,
}

impl CsvStore {
    /// Open the store, creating missing collections with their declared
    /// columns and completing any approval interrupted by a crash.
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir).await?;

        let store = Self {
            journal: ApprovalJournal::new(data_dir.join(JOURNAL_FILE_NAME)),
            data_dir,
        };

        for collection in [Collection::Pending, Collection::Repository] {
            store.ensure_collection(collection).await?;
        }

        store.replay_journal().await?;

        info!(data_dir = %store.data_dir.display(), "Opened CSV record store");
        Ok(store)
    }

    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    async fn ensure_collection(&self, collection: Collection) -> Result<()> {
        let path = self.collection_path(collection);
        if tokio::fs::try_exists(&path).await? {
            return Ok(());
        }

        write_atomically(&path, &encode_collection(collection, &[])?).await?;
        info!(path = %path.display(), "Created {} collection", collection);
        Ok(())
    }

    async fn save(&self, collection: Collection, rows: &[ProverbRecord]) -> Result<()> {
        let bytes = encode_collection(collection, rows)?;
        write_atomically(&self.collection_path(collection), &bytes).await?;
        debug!(%collection, rows = rows.len(), "Rewrote collection");
        Ok(())
    }

    /// Apply a journaled approval.
    ///
    /// The repository append is skipped when the repository has already grown
    /// past the length recorded at `begin`, i.e. an earlier attempt made it.
    async fn apply(&self, entry: &JournalEntry) -> Result<()> {
        let mut repository = self.read_all(Collection::Repository).await?;
        if repository.len() == entry.repository_len {
            repository.push(ProverbRecord::Approved(entry.record.clone()));
            self.save(Collection::Repository, &repository).await?;
        } else {
            debug!(
                serial_no = entry.serial_no,
                recorded = entry.repository_len,
                current = repository.len(),
                "Repository append already applied"
            );
        }

        self.remove_by_key(Collection::Pending, "serial_no", &entry.serial_no.to_string())
            .await?;
        Ok(())
    }

    async fn replay_journal(&self) -> Result<()> {
        if let Some(entry) = self.journal.pending().await? {
            warn!(
                journal_id = %entry.id,
                serial_no = entry.serial_no,
                started_at = %entry.started_at,
                "Completing interrupted approval"
            );
            self.apply(&entry).await?;
            self.journal.clear().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for CsvStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Csv
    }

    async fn read_all(&self, collection: Collection) -> Result<Vec<ProverbRecord>> {
        let path = self.collection_path(collection);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Collection file missing, reading as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        decode_collection(collection, &bytes).map_err(|reason| {
            Error::Storage(format!("{} is unreadable: {}", path.display(), reason))
        })
    }

    async fn append(&self, collection: Collection, record: &ProverbRecord) -> Result<()> {
        ensure_shape(collection, record)?;

        let mut rows = self.read_all(collection).await?;
        rows.push(record.clone());
        self.save(collection, &rows).await
    }

    async fn remove_by_key(
        &self,
        collection: Collection,
        key_field: &str,
        key_value: &str,
    ) -> Result<usize> {
        ensure_key_field(collection, key_field)?;

        let mut rows = self.read_all(collection).await?;
        let before = rows.len();
        rows.retain(|row| !matches_key(row, key_field, key_value));
        let removed = before - rows.len();

        if removed > 0 {
            self.save(collection, &rows).await?;
        }
        Ok(removed)
    }

    async fn transfer(&self, serial_no: i64, approved: &ApprovedRecord) -> Result<bool> {
        let pending = self.read_all(Collection::Pending).await?;
        if !pending.iter().any(|row| row.serial_no() == Some(serial_no)) {
            return Ok(false);
        }

        let repository_len = self.read_all(Collection::Repository).await?.len();
        let entry = JournalEntry::new(serial_no, approved.clone(), repository_len);
        self.journal.begin(&entry).await?;
        self.apply(&entry).await?;
        self.journal.clear().await?;

        Ok(true)
    }
}

/// Decode raw collection bytes: UTF-8 first, Windows-1252 second.
///
/// The error string carries both failures; the caller turns it into a fatal
/// storage error.
pub(crate) fn decode_collection(
    collection: Collection,
    bytes: &[u8],
) -> std::result::Result<Vec<ProverbRecord>, String> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Vec::new());
    }

    let primary_err = match std::str::from_utf8(body) {
        Ok(text) => match parse_rows(collection, text) {
            Ok(rows) => return Ok(rows),
            Err(e) => format!("as UTF-8: {}", e),
        },
        Err(e) => format!("as UTF-8: {}", e),
    };

    let (text, _) = WINDOWS_1252.decode_without_bom_handling(body);
    match parse_rows(collection, &text) {
        Ok(rows) => {
            warn!(%collection, "Collection is not valid UTF-8, read as Windows-1252");
            Ok(rows)
        }
        Err(legacy_err) => Err(format!("{}; as Windows-1252: {}", primary_err, legacy_err)),
    }
}

fn parse_rows(collection: Collection, text: &str) -> std::result::Result<Vec<ProverbRecord>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let missing: Vec<&str> = collection
        .columns()
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing columns {}", missing.join(", ")));
    }

    match collection {
        Collection::Pending => reader
            .deserialize::<PendingRecord>()
            .map(|row| row.map(ProverbRecord::Pending).map_err(|e| e.to_string()))
            .collect(),
        Collection::Repository => reader
            .deserialize::<ApprovedRecord>()
            .map(|row| row.map(ProverbRecord::Approved).map_err(|e| e.to_string()))
            .collect(),
    }
}

/// Encode rows under the declared header, UTF-8 with BOM
pub(crate) fn encode_collection(collection: Collection, rows: &[ProverbRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(collection.columns())?;
    for row in rows {
        ensure_shape(collection, row)?;
        match row {
            ProverbRecord::Pending(r) => writer.serialize(r)?,
            ProverbRecord::Approved(r) => writer.serialize(r)?,
        }
    }

    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}
