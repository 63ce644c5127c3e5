//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Message not found: {0}")]
    MessageNotFound(String),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    #[error("Invalid conversation: {0}")]
    InvalidConversation(String),

    #[error("Unknown genre: {0}")]
    UnknownGenre(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Missing permission: {0}")]
    MissingPermission(String),

    #[error("Not message author")]
    NotMessageAuthor,

    #[error("Not a participant of this conversation")]
    NotParticipant,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    #[error("Document version conflict at {path}")]
    VersionConflict { path: String },

    #[error("Transaction aborted after {attempts} conflicting attempts")]
    TransactionConflict { attempts: u32 },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Store unavailable: {0}")]
    TransportError(String),

    #[error("Corrupt document at {path}: {reason}")]
    CorruptDocument { path: String, reason: String },

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::GameNotFound(_) => "UNKNOWN_GAME",
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::ConversationNotFound(_) => "UNKNOWN_CONVERSATION",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidRating(_) => "INVALID_RATING",
            Self::InvalidSlug(_) => "INVALID_SLUG",
            Self::InvalidConversation(_) => "INVALID_CONVERSATION",
            Self::UnknownGenre(_) => "UNKNOWN_GENRE",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            // Authorization
            Self::MissingPermission(_) => "MISSING_PERMISSIONS",
            Self::NotMessageAuthor => "NOT_MESSAGE_AUTHOR",
            Self::NotParticipant => "NOT_PARTICIPANT",

            // Conflict
            Self::SlugTaken(_) => "SLUG_TAKEN",
            Self::VersionConflict { .. } => "VERSION_CONFLICT",
            Self::TransactionConflict { .. } => "TRANSACTION_CONFLICT",

            // Infrastructure
            Self::TransportError(_) => "STORE_UNAVAILABLE",
            Self::CorruptDocument { .. } => "CORRUPT_DOCUMENT",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GameNotFound(_)
                | Self::UserNotFound(_)
                | Self::MessageNotFound(_)
                | Self::ConversationNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidRating(_)
                | Self::InvalidSlug(_)
                | Self::InvalidConversation(_)
                | Self::UnknownGenre(_)
                | Self::ContentTooLong { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::MissingPermission(_) | Self::NotMessageAuthor | Self::NotParticipant
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::SlugTaken(_) | Self::VersionConflict { .. } | Self::TransactionConflict { .. }
        )
    }

    /// Conflicts a transaction body may be re-run for.
    ///
    /// `TransactionConflict` is terminal: the retry budget is already spent.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    /// Check if the backing store could not be reached
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::TransportError(_))
    }
}
