//! Path parameter extractors
//!
//! Typed extraction of route parameters with rejections mapped to `ApiError`.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use gamehub_core::value_objects::ChatScope;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::response::ApiError;

/// Extract route parameters into `T`
#[derive(Debug, Clone)]
pub struct PathParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Ok(PathParams(inner))
    }
}

/// Path parameters with game_id
#[derive(Debug, Deserialize)]
pub struct GameIdPath {
    pub game_id: String,
}

/// Path parameters with slug
#[derive(Debug, Deserialize)]
pub struct SlugPath {
    pub slug: String,
}

/// Path parameters with user_id
#[derive(Debug, Deserialize)]
pub struct UserIdPath {
    pub user_id: String,
}

/// Path parameters with a chat scope (`team` or a peer user id)
#[derive(Debug, Deserialize)]
pub struct ScopePath {
    pub scope: String,
}

impl ScopePath {
    /// Resolve the scope for the calling user
    pub fn resolve(&self, caller: &str) -> Result<ChatScope, ApiError> {
        resolve_scope(&self.scope, caller)
    }
}

/// Path parameters with scope and message_id
#[derive(Debug, Deserialize)]
pub struct MessagePath {
    pub scope: String,
    pub message_id: String,
}

impl MessagePath {
    pub fn resolve(&self, caller: &str) -> Result<ChatScope, ApiError> {
        resolve_scope(&self.scope, caller)
    }
}

/// Path parameters with scope, message_id and emoji
#[derive(Debug, Deserialize)]
pub struct ReactionPath {
    pub scope: String,
    pub message_id: String,
    pub emoji: String,
}

impl ReactionPath {
    pub fn resolve(&self, caller: &str) -> Result<ChatScope, ApiError> {
        resolve_scope(&self.scope, caller)
    }
}

fn resolve_scope(segment: &str, caller: &str) -> Result<ChatScope, ApiError> {
    ChatScope::resolve(segment, caller).map_err(ApiError::from)
}
