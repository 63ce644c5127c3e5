//! Value objects - immutable domain primitives

mod chat_scope;
mod conversation_id;
mod document_path;
mod genre;
mod slug;

pub use chat_scope::ChatScope;
pub use conversation_id::ConversationId;
pub use document_path::{collections, DocumentPath};
pub use genre::Genre;
pub use slug::{slugify, validate_slug};
