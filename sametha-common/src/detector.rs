//! Duplicate detection across the repository and pending collections
//!
//! Every row contributes a key set: the comparable form of its source text and
//! the plain form of its English text. A candidate is a duplicate when its key
//! is in some row's set. Repository rows are scanned first so the approved
//! entry is reported when a proverb exists in both collections.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use crate::models::{Collection, ProverbRecord};
use crate::normalize::{normalize_composed, to_comparable_form, SourceScript};
use crate::store::RecordStore;
use crate::Result;

/// Outcome of a duplicate check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Verdict {
    /// An equivalent proverb is already stored
    Exists { record: ProverbRecord },
    /// No equivalent proverb; `romanized` previews the comparable form
    New { romanized: String },
}

impl Verdict {
    pub fn is_new(&self) -> bool {
        matches!(self, Verdict::New { .. })
    }
}

/// Normalized comparison keys of one row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeySet(BTreeSet<String>);

impl KeySet {
    pub fn for_record(record: &ProverbRecord, script: SourceScript) -> Self {
        let mut keys = BTreeSet::new();
        for key in [
            to_comparable_form(record.source_text(), script),
            normalize_composed(record.translated_text()),
        ] {
            // An empty cell must not match an empty candidate
            if !key.is_empty() {
                keys.insert(key);
            }
        }
        Self(keys)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Linear-scan duplicate detector
#[derive(Clone)]
pub struct DuplicateDetector {
    store: Arc<dyn RecordStore>,
    script: SourceScript,
}

impl DuplicateDetector {
    pub fn new(store: Arc<dyn RecordStore>, script: SourceScript) -> Self {
        Self { store, script }
    }

    /// Comparison key of free-form candidate text
    pub fn candidate_key(&self, text: &str) -> String {
        to_comparable_form(text, self.script)
    }

    /// Check `candidate` against the repository, then the pending collection.
    ///
    /// The first matching row is returned; blank candidates are always new.
    pub async fn check(&self, candidate: &str) -> Result<Verdict> {
        let key = self.candidate_key(candidate);
        if key.is_empty() {
            return Ok(Verdict::New { romanized: key });
        }

        for collection in [Collection::Repository, Collection::Pending] {
            let rows = self.store.read_all(collection).await?;
            if let Some(found) = rows
                .into_iter()
                .find(|row| KeySet::for_record(row, self.script).contains(&key))
            {
                debug!(%collection, key = %key, "Duplicate proverb found");
                return Ok(Verdict::Exists { record: found });
            }
        }

        debug!(key = %key, "No duplicate found");
        Ok(Verdict::New { romanized: key })
    }
}
