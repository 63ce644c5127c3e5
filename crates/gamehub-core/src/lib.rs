//! # gamehub-core
//!
//! Domain layer containing entities, value objects, the document store port, and the
//! pure rules behind review aggregation, reaction toggling, and activity projection.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod projections;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ChatMessage, Conversation, Game, GameCategory, Media, NewsUpdate, ParticipantInfo,
    PinnedMessage, RatingAggregate, ReactionToggle, Review, UserProfile, UserRole,
};
pub use error::DomainError;
pub use projections::{genre_histogram, project_user_activity, GenreCount, UserActivity};
pub use traits::{
    decode, encode, Document, DocumentStore, Keyed, Precondition, RepoResult,
    VersionedDocument, WriteBatch, WriteOp,
};
pub use value_objects::{
    collections, slugify, validate_slug, ChatScope, ConversationId, DocumentPath, Genre,
};
