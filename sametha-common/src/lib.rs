//! # Sametha Common Library
//!
//! Core of the proverb annotation repository:
//! - Text normalization and Telugu → ITRANS romanization
//! - Record store over the pending and repository collections (CSV or SQLite)
//! - Duplicate detection across both scripts
//! - Submission lifecycle (serial allocation, approval)
//! - Configuration loading and error types

pub mod actor;
pub mod annotations;
pub mod config;
pub mod detector;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod normalize;
pub mod store;
pub mod time;

pub use actor::{Actor, Role};
pub use annotations::Annotations;
pub use detector::{DuplicateDetector, Verdict};
pub use error::{Error, Result};
pub use lifecycle::LifecycleManager;
pub use models::{AnnotationFields, ApprovedRecord, Collection, PendingRecord, ProverbRecord};
pub use normalize::{normalize_composed, normalize_plain, to_comparable_form, SourceScript};
pub use store::{RecordStore, StorageBackend};
