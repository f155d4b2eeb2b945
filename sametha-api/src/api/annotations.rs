//! Annotator endpoints

use axum::{extract::State, http::StatusCode, Json};
use sametha_common::{AnnotationFields, PendingRecord};
use serde::Serialize;

use super::CallerActor;
use crate::{ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct ContributionCount {
    pub annotator: String,
    pub count: usize,
}

/// POST /api/annotations
pub async fn submit_annotation(
    State(state): State<AppState>,
    CallerActor(actor): CallerActor,
    Json(fields): Json<AnnotationFields>,
) -> ApiResult<(StatusCode, Json<PendingRecord>)> {
    let record = state.annotations.submit_annotation(&actor, fields).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/annotations/count
pub async fn contribution_count(
    State(state): State<AppState>,
    CallerActor(actor): CallerActor,
) -> ApiResult<Json<ContributionCount>> {
    let count = state.annotations.contribution_count(&actor).await?;
    Ok(Json(ContributionCount {
        annotator: actor.name,
        count,
    }))
}
