//! Write-ahead journal for approvals on the CSV backend
//!
//! An approval touches two files. The intent is recorded here first, so an
//! interrupted approval is completed on the next open instead of leaving the
//! row in both collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use super::write_atomically;
use crate::models::ApprovedRecord;
use crate::{Error, Result};

pub const JOURNAL_FILE_NAME: &str = "approval.journal";

/// One in-flight approval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub serial_no: i64,
    pub record: ApprovedRecord,
    /// Repository row count before the approval touched it
    pub repository_len: usize,
    pub started_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(serial_no: i64, record: ApprovedRecord, repository_len: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            serial_no,
            record,
            repository_len,
            started_at: crate::time::now(),
        }
    }
}

/// Single-slot journal file next to the collections
#[derive(Debug, Clone)]
pub struct ApprovalJournal {
    path: PathBuf,
}

impl ApprovalJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Durably record the intent before either collection is modified
    pub async fn begin(&self, entry: &JournalEntry) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(entry)
            .map_err(|e| Error::Internal(format!("Failed to serialize journal entry: {}", e)))?;
        write_atomically(&self.path, &bytes).await
    }

    /// The unfinished approval, if any
    pub async fn pending(&self) -> Result<Option<JournalEntry>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            Error::Storage(format!(
                "Approval journal {} is unreadable: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Mark the approval complete
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> JournalEntry {
        JournalEntry::new(
            9,
            ApprovedRecord {
                source_text: "ఆరు నెలలు".to_string(),
                translated_text: "six months".to_string(),
                meaning: "patience".to_string(),
                keywords: "time".to_string(),
            },
            3,
        )
    }

    #[tokio::test]
    async fn test_begin_then_pending_returns_entry() {
        let dir = tempfile::tempdir().unwrap();
        let journal = ApprovalJournal::new(dir.path().join(JOURNAL_FILE_NAME));
        let entry = entry();

        journal.begin(&entry).await.unwrap();
        assert_eq!(journal.pending().await.unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let journal = ApprovalJournal::new(dir.path().join(JOURNAL_FILE_NAME));

        journal.begin(&entry()).await.unwrap();
        journal.clear().await.unwrap();
        journal.clear().await.unwrap();
        assert_eq!(journal.pending().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_garbage_journal_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(JOURNAL_FILE_NAME);
        std::fs::write(&path, b"{not json").unwrap();

        let journal = ApprovalJournal::new(path);
        assert!(matches!(journal.pending().await, Err(Error::Storage(_))));
    }
}
