//! Chat scopes - where a message lives

use std::fmt;

use crate::error::DomainError;
use crate::value_objects::document_path::{collections, DocumentPath};
use crate::value_objects::ConversationId;

/// Route segment naming the team channel
pub const TEAM_SCOPE: &str = "team";

/// A chat channel: the shared team chat or one direct-message conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChatScope {
    Team,
    Direct(ConversationId),
}

impl ChatScope {
    /// Resolve a route segment (`team` or a peer user id) for `caller`
    pub fn resolve(segment: &str, caller: &str) -> Result<Self, DomainError> {
        if segment == TEAM_SCOPE {
            return Ok(Self::Team);
        }
        ConversationId::between(caller, segment).map(Self::Direct)
    }

    /// Collection holding this scope's messages
    pub fn messages_collection(&self) -> String {
        match self {
            Self::Team => collections::TEAM_CHAT.to_string(),
            Self::Direct(id) => format!(
                "{}/{}/{}",
                collections::CONVERSATIONS,
                id,
                collections::MESSAGES
            ),
        }
    }

    pub fn message_path(&self, message_id: &str) -> DocumentPath {
        DocumentPath::new(self.messages_collection(), message_id)
    }

    /// Singleton pin pointer of this scope
    pub fn pin_path(&self) -> DocumentPath {
        match self {
            Self::Team => DocumentPath::new(collections::TEAM_CHAT_META, collections::PINNED_MESSAGE),
            Self::Direct(id) => DocumentPath::new(
                format!("{}/{}/{}", collections::CONVERSATIONS, id, collections::META),
                collections::PINNED_MESSAGE,
            ),
        }
    }

    pub fn conversation_id(&self) -> Option<&ConversationId> {
        match self {
            Self::Team => None,
            Self::Direct(id) => Some(id),
        }
    }

    #[inline]
    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct(_))
    }

    /// Whether `user_id` may read and write in this scope
    pub fn admits(&self, user_id: &str) -> bool {
        match self {
            Self::Team => true,
            Self::Direct(id) => id.includes(user_id),
        }
    }
}

impl fmt::Display for ChatScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Team => f.write_str(TEAM_SCOPE),
            Self::Direct(id) => write!(f, "dm:{id}"),
        }
    }
}
