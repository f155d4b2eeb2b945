//! Proverb record shapes and collection layout
//!
//! Field names serialize under the persisted column names, so the same types
//! drive the CSV files, the SQLite tables and the JSON API.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::time::timestamp_format;

/// Pending collection columns, in file order
pub const PENDING_COLUMNS: &[&str] = &[
    "serial_no",
    "proverb_telugu",
    "proverb_english",
    "meaning_english",
    "keywords",
    "annotator",
    "timestamp",
];

/// Repository collection columns, in file order
pub const REPOSITORY_COLUMNS: &[&str] = &[
    "proverb_telugu",
    "proverb_english",
    "meaning_english",
    "keywords",
];

/// The two named collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Submissions awaiting review ("new")
    Pending,
    /// Approved proverbs
    Repository,
}

impl Collection {
    /// Declared column set; fixed for the lifetime of the collection
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Collection::Pending => PENDING_COLUMNS,
            Collection::Repository => REPOSITORY_COLUMNS,
        }
    }

    /// Table name, also the CSV file stem
    pub fn table_name(self) -> &'static str {
        match self {
            Collection::Pending => "new_annotations",
            Collection::Repository => "repository",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.csv", self.table_name())
    }

    pub fn has_column(self, column: &str) -> bool {
        self.columns().contains(&column)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Pending => write!(f, "new"),
            Collection::Repository => write!(f, "repository"),
        }
    }
}

/// A submission awaiting admin review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRecord {
    #[serde(deserialize_with = "deserialize_serial_no")]
    pub serial_no: i64,
    #[serde(rename = "proverb_telugu")]
    pub source_text: String,
    #[serde(rename = "proverb_english")]
    pub translated_text: String,
    #[serde(rename = "meaning_english", default)]
    pub meaning: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(rename = "annotator")]
    pub contributor: String,
    #[serde(rename = "timestamp", with = "timestamp_format")]
    pub created_at: NaiveDateTime,
}

/// An approved proverb.
///
/// Canonical approved shape: contributor, timestamp and serial number do not
/// survive approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovedRecord {
    #[serde(rename = "proverb_telugu")]
    pub source_text: String,
    #[serde(rename = "proverb_english")]
    pub translated_text: String,
    #[serde(rename = "meaning_english", default)]
    pub meaning: String,
    #[serde(default)]
    pub keywords: String,
}

impl From<&PendingRecord> for ApprovedRecord {
    fn from(pending: &PendingRecord) -> Self {
        Self {
            source_text: pending.source_text.clone(),
            translated_text: pending.translated_text.clone(),
            meaning: pending.meaning.clone(),
            keywords: pending.keywords.clone(),
        }
    }
}

/// A row of either collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProverbRecord {
    Pending(PendingRecord),
    Approved(ApprovedRecord),
}

impl ProverbRecord {
    pub fn source_text(&self) -> &str {
        match self {
            ProverbRecord::Pending(r) => &r.source_text,
            ProverbRecord::Approved(r) => &r.source_text,
        }
    }

    pub fn translated_text(&self) -> &str {
        match self {
            ProverbRecord::Pending(r) => &r.translated_text,
            ProverbRecord::Approved(r) => &r.translated_text,
        }
    }

    /// Collection whose column set this row has
    pub fn collection(&self) -> Collection {
        match self {
            ProverbRecord::Pending(_) => Collection::Pending,
            ProverbRecord::Approved(_) => Collection::Repository,
        }
    }

    pub fn serial_no(&self) -> Option<i64> {
        match self {
            ProverbRecord::Pending(r) => Some(r.serial_no),
            ProverbRecord::Approved(_) => None,
        }
    }
}

impl From<PendingRecord> for ProverbRecord {
    fn from(record: PendingRecord) -> Self {
        ProverbRecord::Pending(record)
    }
}

impl From<ApprovedRecord> for ProverbRecord {
    fn from(record: ApprovedRecord) -> Self {
        ProverbRecord::Approved(record)
    }
}

/// Fields an annotator fills in on the submission form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationFields {
    #[serde(rename = "proverb_telugu", default)]
    pub source_text: String,
    #[serde(rename = "proverb_english", default)]
    pub translated_text: String,
    #[serde(rename = "meaning_english", default)]
    pub meaning: String,
    #[serde(default)]
    pub keywords: String,
}

/// Parse a serial number cell.
///
/// Spreadsheet round-trips turn integer columns into floats (`"3.0"`), so whole
/// floats are accepted; fractional or empty cells are rejected.
pub fn parse_serial_no(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

fn deserialize_serial_no<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSerial {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match RawSerial::deserialize(deserializer)? {
        RawSerial::Int(n) => Ok(n),
        RawSerial::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        RawSerial::Float(f) => Err(serde::de::Error::custom(format!("invalid serial_no: {}", f))),
        RawSerial::Text(s) => parse_serial_no(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid serial_no: {:?}", s))),
    }
}
