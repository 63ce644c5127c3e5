//! Document addressing

use std::fmt;

/// Collection names of the persisted layout
pub mod collections {
    pub const GAMES: &str = "games";
    pub const GAME_SLUGS: &str = "game-slugs";
    pub const USERS: &str = "users";
    pub const TEAM_CHAT: &str = "team-chat";
    pub const TEAM_CHAT_META: &str = "team-chat-meta";
    pub const CONVERSATIONS: &str = "conversations";

    /// Sub-collection holding a conversation's messages
    pub const MESSAGES: &str = "messages";
    /// Sub-collection holding a conversation's singleton documents
    pub const META: &str = "meta";
    /// Id of the singleton pin pointer within a meta collection
    pub const PINNED_MESSAGE: &str = "pinned-message";
}

/// Address of a document: `{collection}/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    collection: String,
    id: String,
}

impl DocumentPath {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn game(game_id: &str) -> Self {
        Self::new(collections::GAMES, game_id)
    }

    pub fn slug(slug: &str) -> Self {
        Self::new(collections::GAME_SLUGS, slug)
    }

    pub fn user(uid: &str) -> Self {
        Self::new(collections::USERS, uid)
    }

    pub fn conversation(conversation_id: &str) -> Self {
        Self::new(collections::CONVERSATIONS, conversation_id)
    }

    /// Split a full path at its last segment
    pub fn parse(path: &str) -> Option<Self> {
        let (collection, id) = path.rsplit_once('/')?;
        if collection.is_empty() || id.is_empty() {
            return None;
        }
        Some(Self::new(collection, id))
    }

    #[inline]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(DocumentPath::game("g1").to_string(), "games/g1");
        assert_eq!(DocumentPath::slug("zelda").to_string(), "game-slugs/zelda");
    }

    #[test]
    fn test_parse_nested() {
        let path = DocumentPath::parse("conversations/a_b/messages/m1").unwrap();
        assert_eq!(path.collection(), "conversations/a_b/messages");
        assert_eq!(path.id(), "m1");
        assert!(DocumentPath::parse("games").is_none());
        assert!(DocumentPath::parse("games/").is_none());
    }
}
