//! HTTP API handlers for sametha-api

pub mod actor;
pub mod admin;
pub mod annotations;
pub mod health;
pub mod verify;

pub use actor::{CallerActor, ROLE_HEADER, USER_HEADER};
pub use admin::{annotator_stats, approve, list_pending, list_repository};
pub use annotations::{contribution_count, submit_annotation};
pub use health::health_routes;
pub use verify::verify_duplicate;
