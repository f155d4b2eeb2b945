//! Submission lifecycle: pending → approved
//!
//! Serial allocation plus append, and approval, run under one async mutex so
//! two submissions in this process can never share a serial number. The move
//! between collections is delegated to [`RecordStore::transfer`].

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::{AnnotationFields, ApprovedRecord, Collection, PendingRecord, ProverbRecord};
use crate::normalize::normalize_composed;
use crate::store::RecordStore;
use crate::{Error, Result};

pub struct LifecycleManager {
    store: Arc<dyn RecordStore>,
    write_lock: Mutex<()>,
}

impl LifecycleManager {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Next pending serial number: highest existing plus one, or 1 when empty
    pub async fn allocate_serial(&self) -> Result<i64> {
        let pending = self.store.read_pending().await?;
        Ok(pending.iter().map(|r| r.serial_no).max().map_or(1, |max| max + 1))
    }

    /// Store a new pending annotation.
    ///
    /// Both proverb texts must be non-blank; otherwise nothing is written and
    /// [`Error::Validation`] names the offending column.
    pub async fn submit(&self, fields: AnnotationFields, contributor: &str) -> Result<PendingRecord> {
        validate_required("proverb_telugu", &fields.source_text)?;
        validate_required("proverb_english", &fields.translated_text)?;
        validate_required("annotator", contributor)?;

        let _guard = self.write_lock.lock().await;

        let record = PendingRecord {
            serial_no: self.allocate_serial().await?,
            source_text: fields.source_text.trim().to_string(),
            translated_text: normalize_composed(&fields.translated_text),
            meaning: fields.meaning.trim().to_string(),
            keywords: fields.keywords.trim().to_string(),
            contributor: contributor.trim().to_string(),
            created_at: crate::time::submission_timestamp(),
        };

        self.store
            .append(Collection::Pending, &ProverbRecord::Pending(record.clone()))
            .await?;

        info!(
            serial_no = record.serial_no,
            annotator = %record.contributor,
            "Annotation submitted"
        );
        Ok(record)
    }

    /// Move pending annotation `serial_no` into the repository
    pub async fn approve(&self, serial_no: i64) -> Result<ApprovedRecord> {
        let _guard = self.write_lock.lock().await;

        let pending = self
            .store
            .read_pending()
            .await?
            .into_iter()
            .find(|r| r.serial_no == serial_no)
            .ok_or_else(|| not_found(serial_no))?;

        let approved = ApprovedRecord::from(&pending);
        if !self.store.transfer(serial_no, &approved).await? {
            return Err(not_found(serial_no));
        }

        info!(
            serial_no,
            annotator = %pending.contributor,
            backend = %self.store.backend(),
            "Annotation approved"
        );
        Ok(approved)
    }

    /// Pending annotations attributed to `contributor`
    pub async fn contribution_count(&self, contributor: &str) -> Result<usize> {
        let contributor = contributor.trim();
        Ok(self
            .store
            .read_pending()
            .await?
            .iter()
            .filter(|r| r.contributor == contributor)
            .count())
    }

    /// Pending annotation count per contributor
    pub async fn annotator_stats(&self) -> Result<BTreeMap<String, usize>> {
        let mut stats = BTreeMap::new();
        for record in self.store.read_pending().await? {
            *stats.entry(record.contributor).or_insert(0) += 1;
        }
        Ok(stats)
    }
}

fn validate_required(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::Validation { field })
    } else {
        Ok(())
    }
}

fn not_found(serial_no: i64) -> Error {
    Error::NotFound(format!("no pending annotation with serial_no {}", serial_no))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_trims() {
        assert!(validate_required("proverb_telugu", "  x ").is_ok());
        assert!(matches!(
            validate_required("proverb_telugu", " \t "),
            Err(Error::Validation { field: "proverb_telugu" })
        ));
    }

    #[test]
    fn test_not_found_mentions_serial() {
        assert!(not_found(42).to_string().contains("42"));
    }
}
