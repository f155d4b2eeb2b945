//! sametha-api library - HTTP surface of the proverb annotation repository
//!
//! Handlers are thin: each one derives the calling [`sametha_common::Actor`]
//! from request headers and forwards to [`Annotations`].

use axum::Router;
use sametha_common::Annotations;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub annotations: Arc<Annotations>,
}

impl AppState {
    pub fn new(annotations: Annotations) -> Self {
        Self {
            annotations: Arc::new(annotations),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let annotator = Router::new()
        .route("/api/verify", post(api::verify_duplicate))
        .route("/api/annotations", post(api::submit_annotation))
        .route("/api/annotations/count", get(api::contribution_count));

    let admin = Router::new()
        .route("/api/admin/pending", get(api::list_pending))
        .route("/api/admin/repository", get(api::list_repository))
        .route("/api/admin/approve/:serial_no", post(api::approve))
        .route("/api/admin/annotators", get(api::annotator_stats));

    Router::new()
        .merge(annotator)
        .merge(admin)
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
