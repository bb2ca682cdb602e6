//! Caller identity extraction
//!
//! Authentication itself (sessions, tokens, password handling) lives in
//! an external service that fronts this API; it forwards the
//! authenticated user's id in the `x-user-id` header. These extractors
//! are the only place that header is read.

use super::response::ApiError;
use super::user_handler::AppState;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::user::User;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

/// Header carrying the authenticated user id
pub const CALLER_HEADER: &str = "x-user-id";

/// Identity of an authenticated caller; rejects with 401 when the
/// header is absent or malformed.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity(pub Uuid);

/// Identity of a caller on routes that also serve anonymous requests.
/// A missing header is fine; a malformed one is still rejected.
#[derive(Debug, Clone, Copy)]
pub struct MaybeCaller(pub Option<Uuid>);

fn parse_header(parts: &Parts) -> Result<Option<Uuid>> {
    let Some(value) = parts.headers.get(CALLER_HEADER) else {
        return Ok(None);
    };
    let raw = value.to_str().map_err(|_| {
        DomainError::Unauthorized("invalid x-user-id header".to_string())
    })?;
    let id = Uuid::parse_str(raw.trim()).map_err(|_| {
        DomainError::Unauthorized("invalid x-user-id header".to_string())
    })?;
    Ok(Some(id))
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        match parse_header(parts)? {
            Some(id) => Ok(CallerIdentity(id)),
            None => Err(ApiError(DomainError::Unauthorized(
                "authentication required".to_string(),
            ))),
        }
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for MaybeCaller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(MaybeCaller(parse_header(parts)?))
    }
}

/// Load the caller's user record. An id the store does not know means
/// the auth collaborator and this service disagree; treat it as an
/// authentication failure rather than a missing resource.
pub async fn require_user(state: &AppState, caller: CallerIdentity) -> Result<User> {
    state
        .users
        .find_by_id(caller.0)
        .await?
        .ok_or_else(|| DomainError::Unauthorized("unknown caller".to_string()))
}
