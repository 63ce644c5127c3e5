//! Review entity - a user's rating and comment on a game

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DomainError;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Review entity, embedded in its game document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub id: String,
    /// Display name at the time of writing
    pub author: String,
    pub author_id: String,
    pub rating: u8,
    pub comment: String,
    /// Absent on legacy documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Review {
    /// Create a new Review stamped with the current time
    pub fn new(
        id: String,
        author: String,
        author_id: String,
        rating: u8,
        comment: String,
    ) -> Result<Self, DomainError> {
        Self::check_rating(rating)?;
        Ok(Self {
            id,
            author,
            author_id,
            rating,
            comment,
            created_at: Some(Utc::now()),
            avatar_url: None,
            extra: Map::new(),
        })
    }

    pub fn check_rating(rating: u8) -> Result<(), DomainError> {
        if (MIN_RATING..=MAX_RATING).contains(&rating) {
            Ok(())
        } else {
            Err(DomainError::InvalidRating(rating))
        }
    }

    /// Timestamp used for ordering; missing timestamps order as the epoch
    pub fn sort_key(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or(DateTime::UNIX_EPOCH)
    }
}
