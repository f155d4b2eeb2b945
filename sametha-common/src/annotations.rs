//! Entry point for the web layer
//!
//! Wires one store into the detector and the lifecycle manager and applies
//! the role checks for each operation.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::actor::{Actor, Role};
use crate::detector::{DuplicateDetector, Verdict};
use crate::lifecycle::LifecycleManager;
use crate::models::{AnnotationFields, ApprovedRecord, PendingRecord};
use crate::normalize::SourceScript;
use crate::store::{open_store, RecordStore, StorageBackend};
use crate::Result;

pub struct Annotations {
    store: Arc<dyn RecordStore>,
    detector: DuplicateDetector,
    lifecycle: LifecycleManager,
}

impl Annotations {
    pub fn new(store: Arc<dyn RecordStore>, script: SourceScript) -> Self {
        Self {
            detector: DuplicateDetector::new(store.clone(), script),
            lifecycle: LifecycleManager::new(store.clone()),
            store,
        }
    }

    /// Open the configured backend under `root_folder`
    pub async fn open(
        backend: StorageBackend,
        root_folder: &Path,
        script: SourceScript,
    ) -> Result<Self> {
        Ok(Self::new(open_store(backend, root_folder).await?, script))
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// "Check before submit": any actor may ask
    pub async fn verify_duplicate(&self, text: &str) -> Result<Verdict> {
        self.detector.check(text).await
    }

    pub async fn submit_annotation(
        &self,
        actor: &Actor,
        fields: AnnotationFields,
    ) -> Result<PendingRecord> {
        actor.require(Role::Annotator)?;
        self.lifecycle.submit(fields, &actor.name).await
    }

    /// The caller's own pending contribution count
    pub async fn contribution_count(&self, actor: &Actor) -> Result<usize> {
        actor.require(Role::Annotator)?;
        self.lifecycle.contribution_count(&actor.name).await
    }

    pub async fn list_pending(&self, actor: &Actor) -> Result<Vec<PendingRecord>> {
        actor.require(Role::Admin)?;
        self.store.read_pending().await
    }

    pub async fn list_repository(&self, actor: &Actor) -> Result<Vec<ApprovedRecord>> {
        actor.require(Role::Admin)?;
        self.store.read_repository().await
    }

    pub async fn approve(&self, actor: &Actor, serial_no: i64) -> Result<ApprovedRecord> {
        actor.require(Role::Admin)?;
        self.lifecycle.approve(serial_no).await
    }

    pub async fn annotator_stats(&self, actor: &Actor) -> Result<BTreeMap<String, usize>> {
        actor.require(Role::Admin)?;
        self.lifecycle.annotator_stats().await
    }
}
