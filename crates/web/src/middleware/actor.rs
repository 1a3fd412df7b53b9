use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::WebError;

pub const ACTOR_HEADER: &str = "x-actor-id";

/// The user on whose behalf a request acts, resolved upstream by the identity
/// provider and forwarded in the `X-Actor-Id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| WebError::Unauthorized("Missing X-Actor-Id header".to_string()))?;

        let id = Uuid::parse_str(value.trim())
            .map_err(|_| WebError::BadRequest("X-Actor-Id must be a UUID".to_string()))?;

        Ok(Actor(id))
    }
}
