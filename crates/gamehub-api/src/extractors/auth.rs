//! Caller identity extractor
//!
//! Authentication happens upstream; the gateway forwards the verified user id in
//! `x-user-id` and, optionally, a display name in `x-user-name`.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{self, Header, HeaderName, HeaderValue},
    typed_header::TypedHeaderRejectionReason,
    TypedHeader,
};
use gamehub_service::Caller;

use crate::response::ApiError;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's display name
pub const USER_NAME_HEADER: &str = "x-user-name";

static USER_ID_NAME: HeaderName = HeaderName::from_static(USER_ID_HEADER);
static USER_NAME_NAME: HeaderName = HeaderName::from_static(USER_NAME_HEADER);

/// Typed `x-user-id` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdHeader(pub String);

impl Header for UserIdHeader {
    fn name() -> &'static HeaderName {
        &USER_ID_NAME
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        decode_text(values).map(Self)
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        encode_text(&self.0, values);
    }
}

/// Typed `x-user-name` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNameHeader(pub String);

impl Header for UserNameHeader {
    fn name() -> &'static HeaderName {
        &USER_NAME_NAME
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        decode_text(values).map(Self)
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        encode_text(&self.0, values);
    }
}

fn decode_text<'i, I>(values: &mut I) -> Result<String, headers::Error>
where
    I: Iterator<Item = &'i HeaderValue>,
{
    let value = values.next().ok_or_else(headers::Error::invalid)?;
    let text = value.to_str().map_err(|_| headers::Error::invalid())?.trim();
    if text.is_empty() {
        return Err(headers::Error::invalid());
    }
    Ok(text.to_string())
}

fn encode_text<E: Extend<HeaderValue>>(text: &str, values: &mut E) {
    if let Ok(value) = HeaderValue::from_str(text) {
        values.extend(std::iter::once(value));
    }
}

/// Authenticated user taken from the gateway headers
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub name: Option<String>,
}

impl AuthUser {
    /// Create a new AuthUser
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
        }
    }

    /// Identity in the form services expect
    pub fn caller(&self) -> Caller {
        let caller = Caller::new(self.user_id.clone());
        match &self.name {
            Some(name) => caller.with_name(name.clone()),
            None => caller,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(UserIdHeader(user_id)) =
            TypedHeader::<UserIdHeader>::from_request_parts(parts, state)
                .await
                .map_err(|e| match e.reason() {
                    TypedHeaderRejectionReason::Missing => ApiError::MissingIdentity,
                    _ => ApiError::InvalidIdentity,
                })?;

        // Ids become document path segments
        if user_id.contains('/') {
            tracing::warn!(user_id = %user_id, "Rejected user id containing '/'");
            return Err(ApiError::InvalidIdentity);
        }

        let name = TypedHeader::<UserNameHeader>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(UserNameHeader(name))| name);

        Ok(AuthUser { user_id, name })
    }
}
