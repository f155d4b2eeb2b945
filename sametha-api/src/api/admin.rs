//! Review endpoints for administrators

use axum::{
    extract::{Path, State},
    Json,
};
use sametha_common::{ApprovedRecord, PendingRecord};
use serde::Serialize;

use super::CallerActor;
use crate::{ApiResult, AppState};

/// Full listing of one collection
#[derive(Debug, Serialize)]
pub struct RecordList<T> {
    pub records: Vec<T>,
    pub total: usize,
}

impl<T> From<Vec<T>> for RecordList<T> {
    fn from(records: Vec<T>) -> Self {
        Self {
            total: records.len(),
            records,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnnotatorStat {
    pub annotator: String,
    pub contributions: usize,
}

/// GET /api/admin/pending
pub async fn list_pending(
    State(state): State<AppState>,
    CallerActor(actor): CallerActor,
) -> ApiResult<Json<RecordList<PendingRecord>>> {
    let records = state.annotations.list_pending(&actor).await?;
    Ok(Json(records.into()))
}

/// GET /api/admin/repository
pub async fn list_repository(
    State(state): State<AppState>,
    CallerActor(actor): CallerActor,
) -> ApiResult<Json<RecordList<ApprovedRecord>>> {
    let records = state.annotations.list_repository(&actor).await?;
    Ok(Json(records.into()))
}

/// POST /api/admin/approve/:serial_no
///
/// 404 when no pending annotation carries `serial_no`.
pub async fn approve(
    State(state): State<AppState>,
    CallerActor(actor): CallerActor,
    Path(serial_no): Path<i64>,
) -> ApiResult<Json<ApprovedRecord>> {
    let approved = state.annotations.approve(&actor, serial_no).await?;
    Ok(Json(approved))
}

/// GET /api/admin/annotators
pub async fn annotator_stats(
    State(state): State<AppState>,
    CallerActor(actor): CallerActor,
) -> ApiResult<Json<Vec<AnnotatorStat>>> {
    let stats = state
        .annotations
        .annotator_stats(&actor)
        .await?
        .into_iter()
        .map(|(annotator, contributions)| AnnotatorStat {
            annotator,
            contributions,
        })
        .collect();
    Ok(Json(stats))
}
