//! Direct-message conversation identifier

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const SEPARATOR: char = '_';

/// Identifier of the conversation between two users.
///
/// Formed by sorting both user ids and joining them with `_`, so either participant
/// derives the same id. User ids containing `_` or `/` cannot take part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConversationId(String);

impl ConversationId {
    /// Build the id for the conversation between `a` and `b`
    pub fn between(a: &str, b: &str) -> Result<Self, DomainError> {
        check_participant(a)?;
        check_participant(b)?;
        if a == b {
            return Err(DomainError::InvalidConversation(
                "cannot start a conversation with yourself".to_string(),
            ));
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        Ok(Self(format!("{low}{SEPARATOR}{high}")))
    }

    /// Parse a stored id back into a value
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        let (a, b) = id
            .split_once(SEPARATOR)
            .ok_or_else(|| DomainError::InvalidConversation(id.to_string()))?;
        let parsed = Self::between(a, b)?;
        if parsed.0 != id {
            return Err(DomainError::InvalidConversation(id.to_string()));
        }
        Ok(parsed)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Both participant ids, in sorted order
    pub fn participants(&self) -> (&str, &str) {
        self.0.split_once(SEPARATOR).unwrap_or((&self.0, ""))
    }

    pub fn includes(&self, user_id: &str) -> bool {
        let (a, b) = self.participants();
        a == user_id || b == user_id
    }

    /// The participant other than `user_id`
    pub fn peer_of(&self, user_id: &str) -> Option<&str> {
        match self.participants() {
            (a, b) if a == user_id => Some(b),
            (a, b) if b == user_id => Some(a),
            _ => None,
        }
    }
}

fn check_participant(user_id: &str) -> Result<(), DomainError> {
    if user_id.is_empty() || user_id.contains(SEPARATOR) || user_id.contains('/') {
        return Err(DomainError::InvalidConversation(format!(
            "invalid participant id '{user_id}'"
        )));
    }
    Ok(())
}

impl TryFrom<String> for ConversationId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ConversationId> for String {
    fn from(id: ConversationId) -> Self {
        id.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
