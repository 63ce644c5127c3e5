//! Chat message entity - team chat and direct messages share one shape

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::traits::Keyed;

/// Maximum message length in characters
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Outcome of toggling a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionToggle {
    Added,
    Removed,
}

/// Chat message entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Filled from the document key when the body omits it
    #[serde(default)]
    pub id: String,
    pub text: String,
    pub author_id: String,
    /// Team chat documents name this field `author`
    #[serde(alias = "author")]
    pub author_name: String,
    #[serde(
        rename = "photoURL",
        alias = "photoUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_edited: bool,
    /// Emoji to reactor ids in the order they reacted
    #[serde(default)]
    pub reactions: BTreeMap<String, Vec<String>>,
    /// Users who have read the message (direct messages only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub read_by: Vec<String>,
}

impl ChatMessage {
    /// Create a new ChatMessage with a normalized body
    pub fn new(
        id: String,
        author_id: String,
        author_name: String,
        text: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            text: Self::normalize_text(text)?,
            author_id,
            author_name,
            photo_url: None,
            image_url: None,
            created_at: Some(Utc::now()),
            is_edited: false,
            reactions: BTreeMap::new(),
            read_by: Vec::new(),
        })
    }

    /// Trim a message body and enforce the non-empty and length rules
    pub fn normalize_text(text: &str) -> Result<String, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::ValidationError(
                "message text cannot be empty".to_string(),
            ));
        }
        if text.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(DomainError::ContentTooLong {
                max: MAX_MESSAGE_LENGTH,
            });
        }
        Ok(text.to_string())
    }

    /// Check if message was written by `user_id`
    #[inline]
    pub fn is_author(&self, user_id: &str) -> bool {
        self.author_id == user_id
    }

    /// Replace the body and flag the message as edited
    pub fn edit(&mut self, text: &str) -> Result<(), DomainError> {
        self.text = Self::normalize_text(text)?;
        self.is_edited = true;
        Ok(())
    }

    /// Add `user_id` to the reactors of `emoji`, or remove it if already present.
    ///
    /// An emoji whose reactor list becomes empty is removed from the map.
    pub fn toggle_reaction(&mut self, emoji: &str, user_id: &str) -> ReactionToggle {
        let reactors = self.reactions.entry(emoji.to_string()).or_default();
        let outcome = if let Some(pos) = reactors.iter().position(|u| u == user_id) {
            reactors.remove(pos);
            ReactionToggle::Removed
        } else {
            reactors.push(user_id.to_string());
            ReactionToggle::Added
        };
        if reactors.is_empty() {
            self.reactions.remove(emoji);
        }
        outcome
    }

    /// Record that `user_id` has read the message; `false` if it already had
    pub fn mark_read_by(&mut self, user_id: &str) -> bool {
        if self.is_read_by(user_id) {
            return false;
        }
        self.read_by.push(user_id.to_string());
        true
    }

    #[inline]
    pub fn is_read_by(&self, user_id: &str) -> bool {
        self.read_by.iter().any(|u| u == user_id)
    }

    /// Timestamp used for ordering; missing timestamps order as the epoch
    pub fn sort_key(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or(DateTime::UNIX_EPOCH)
    }
}

impl Keyed for ChatMessage {
    fn fill_id(&mut self, id: &str) {
        if self.id.is_empty() {
            self.id = id.to_string();
        }
    }
}
