//! Axum extractors for request handling
//!
//! Custom extractors for caller identity, validation, and path parameters.

mod auth;
mod path;
mod validated;

pub use auth::{AuthUser, UserIdHeader, UserNameHeader, USER_ID_HEADER, USER_NAME_HEADER};
pub use path::{GameIdPath, MessagePath, PathParams, ReactionPath, ScopePath, SlugPath, UserIdPath};
pub use validated::{OptionalValidatedJson, ValidatedJson};
