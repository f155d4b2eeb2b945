//! Liveness check

use axum::{extract::State, routing::get, Json, Router};
use sametha_common::{RecordStore, StorageBackend};
use serde::Serialize;

use crate::AppState;

const MODULE_NAME: &str = "sametha-api";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub backend: StorageBackend,
}

/// GET /health
///
/// No caller identity required.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: MODULE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        backend: state.annotations.store().backend(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
