//! Duplicate check before submission

use axum::{extract::State, Json};
use sametha_common::Verdict;
use serde::Deserialize;

use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub value: String,
}

/// POST /api/verify
///
/// Open to any caller. Responds with `{"status": "exists", "record": ...}` or
/// `{"status": "new", "romanized": ...}`.
pub async fn verify_duplicate(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> ApiResult<Json<Verdict>> {
    let verdict = state.annotations.verify_duplicate(&request.value).await?;
    Ok(Json(verdict))
}
