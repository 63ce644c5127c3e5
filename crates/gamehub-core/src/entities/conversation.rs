//! Conversation entity - summary document of a direct-message thread

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::ConversationId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub name: String,
    #[serde(default, rename = "photoURL")]
    pub photo_url: String,
}

/// Conversation stored at `conversations/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    pub participants: Vec<String>,
    #[serde(default)]
    pub participants_info: BTreeMap<String, ParticipantInfo>,
    #[serde(default)]
    pub last_message: String,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Start an empty conversation
    pub fn new(id: ConversationId) -> Self {
        let (a, b) = id.participants();
        let participants = vec![a.to_string(), b.to_string()];
        Self {
            id,
            participants,
            participants_info: BTreeMap::new(),
            last_message: String::new(),
            updated_at: Utc::now(),
        }
    }

    /// Record a new message and refresh the sender's display info
    pub fn record_message(
        &mut self,
        sender_id: &str,
        sender: ParticipantInfo,
        text: &str,
        at: DateTime<Utc>,
    ) {
        self.participants_info.insert(sender_id.to_string(), sender);
        self.last_message = text.to_string();
        self.updated_at = at;
    }
}
