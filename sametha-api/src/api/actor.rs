//! Caller identity from upstream session headers
//!
//! Login and sessions are handled in front of this service. The session layer
//! forwards the signed-in user in [`USER_HEADER`] and their role in
//! [`ROLE_HEADER`]; a missing role header means an annotator.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use sametha_common::{Actor, Role};

use crate::ApiError;

pub const USER_HEADER: &str = "x-sametha-user";
pub const ROLE_HEADER: &str = "x-sametha-role";

/// Extractor yielding the [`Actor`] behind a request
#[derive(Debug, Clone)]
pub struct CallerActor(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for CallerActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = header_value(parts, USER_HEADER)?
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ApiError::Unauthorized(format!("missing {} header", USER_HEADER)))?;

        let role = match header_value(parts, ROLE_HEADER)? {
            Some(raw) => raw
                .parse::<Role>()
                .map_err(|e| ApiError::Unauthorized(e.to_string()))?,
            None => Role::Annotator,
        };

        Ok(CallerActor(Actor::new(name, role)))
    }
}

fn header_value(parts: &Parts, name: &str) -> Result<Option<String>, ApiError> {
    parts
        .headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(str::to_string)
                .map_err(|_| ApiError::Unauthorized(format!("{} is not valid text", name)))
        })
        .transpose()
}
