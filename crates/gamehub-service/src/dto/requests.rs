//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Derived fields (`rating`, `reviewsCount`, `reviews`, `role`) are not part of any
//! writable DTO; unknown fields are rejected so they cannot be smuggled in.

use serde::Deserialize;
use validator::Validate;

use gamehub_core::entities::{GameCategory, Media, NewsUpdate, UserRole};

// ============================================================================
// Game Requests
// ============================================================================

/// Create game request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateGameRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Derived from the title when omitted
    #[validate(length(min = 1, max = 100, message = "Slug must be 1-100 characters"))]
    pub slug: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    #[serde(default)]
    pub description: String,

    pub category: GameCategory,

    #[validate(length(max = 20, message = "At most 20 tags"))]
    #[serde(default)]
    pub tags: Vec<String>,

    #[validate(length(max = 200))]
    pub developer: Option<String>,

    pub release_date: Option<String>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    #[validate(url)]
    pub website_url: Option<String>,

    #[validate(url)]
    pub play_store_url: Option<String>,

    #[validate(url)]
    pub app_store_url: Option<String>,

    #[serde(default)]
    pub media: Vec<Media>,

    #[serde(default)]
    pub news: Vec<NewsUpdate>,
}

/// Update game request; only descriptive fields are writable
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateGameRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Slug must be 1-100 characters"))]
    pub slug: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub category: Option<GameCategory>,

    #[validate(length(max = 20, message = "At most 20 tags"))]
    pub tags: Option<Vec<String>>,

    #[validate(length(max = 200))]
    pub developer: Option<String>,

    pub release_date: Option<String>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    #[validate(url)]
    pub website_url: Option<String>,

    #[validate(url)]
    pub play_store_url: Option<String>,

    #[validate(url)]
    pub app_store_url: Option<String>,

    /// Replaces the whole gallery
    pub media: Option<Vec<Media>>,

    /// Replaces the whole news list
    pub news: Option<Vec<NewsUpdate>>,
}

// ============================================================================
// Review Requests
// ============================================================================

/// Submit review request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmitReviewRequest {
    /// Display name shown with the review
    #[validate(length(min = 2, max = 50, message = "Name must be 2-50 characters"))]
    pub author: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,

    #[validate(length(min = 10, max = 2000, message = "Comment must be 10-2000 characters"))]
    pub comment: String,
}

// ============================================================================
// Profile Requests
// ============================================================================

/// Identity data used to create or refresh the caller's profile
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SyncProfileRequest {
    #[validate(length(max = 50))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[serde(rename = "photoURL", alias = "photoUrl")]
    #[validate(url(message = "Photo URL must be a valid URL"))]
    pub photo_url: Option<String>,
}

/// Update own profile request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be 2-50 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,

    /// Empty string clears the link
    #[validate(length(max = 200))]
    pub social_link: Option<String>,

    /// Must be one of the recognized genres
    pub favorite_genre: Option<String>,
}

/// Change a user's role
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Send message request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 4000, message = "Message text is required"))]
    pub text: String,
}

/// Edit message request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditMessageRequest {
    #[validate(length(min = 1, max = 4000, message = "Message text is required"))]
    pub text: String,
}

/// Pin a message in a chat scope
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PinMessageRequest {
    #[validate(length(min = 1, message = "Message id is required"))]
    pub message_id: String,
}

/// Mark messages as read; all unread messages when `messageIds` is omitted
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    #[validate(length(min = 1, max = 500, message = "Between 1 and 500 message ids"))]
    pub message_ids: Option<Vec<String>>,
}
