//! Pinned message pointer - one per chat scope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ChatMessage;

/// Denormalized snapshot of the pinned message plus who pinned it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedMessage {
    pub message: ChatMessage,
    pub pinned_by: String,
    pub pinned_by_id: String,
    pub pinned_at: DateTime<Utc>,
}

impl PinnedMessage {
    pub fn new(message: ChatMessage, pinned_by: String, pinned_by_id: String) -> Self {
        Self {
            message,
            pinned_by,
            pinned_by_id,
            pinned_at: Utc::now(),
        }
    }

    #[inline]
    pub fn points_to(&self, message_id: &str) -> bool {
        self.message.id == message_id
    }
}
