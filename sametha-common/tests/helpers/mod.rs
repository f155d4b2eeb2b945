//! Shared fixtures for sametha-common integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use sametha_common::store::{CsvStore, SqliteStore};
use sametha_common::{ApprovedRecord, PendingRecord, ProverbRecord, RecordStore, StorageBackend};
use std::path::Path;
use std::sync::Arc;

pub const BACKENDS: [StorageBackend; 2] = [StorageBackend::Csv, StorageBackend::Sqlite];

/// Open `backend` rooted in `dir`
pub async fn open(backend: StorageBackend, dir: &Path) -> Arc<dyn RecordStore> {
    match backend {
        StorageBackend::Csv => Arc::new(CsvStore::open(dir.join("data")).await.unwrap()),
        StorageBackend::Sqlite => Arc::new(SqliteStore::open(&dir.join("sametha.db")).await.unwrap()),
    }
}

pub fn approved(source: &str, english: &str) -> ApprovedRecord {
    ApprovedRecord {
        source_text: source.to_string(),
        translated_text: english.to_string(),
        meaning: String::new(),
        keywords: String::new(),
    }
}

pub fn pending(serial_no: i64, source: &str, english: &str, annotator: &str) -> PendingRecord {
    PendingRecord {
        serial_no,
        source_text: source.to_string(),
        translated_text: english.to_string(),
        meaning: format!("meaning of {}", english),
        keywords: "proverb, test".to_string(),
        contributor: annotator.to_string(),
        created_at: NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(10, 30, serial_no as u32 % 60)
            .unwrap(),
    }
}

pub async fn seed_repository(store: &dyn RecordStore, rows: &[ApprovedRecord]) {
    for row in rows {
        store
            .append(sametha_common::Collection::Repository, &ProverbRecord::Approved(row.clone()))
            .await
            .unwrap();
    }
}

pub async fn seed_pending(store: &dyn RecordStore, rows: &[PendingRecord]) {
    for row in rows {
        store
            .append(sametha_common::Collection::Pending, &ProverbRecord::Pending(row.clone()))
            .await
            .unwrap();
    }
}
